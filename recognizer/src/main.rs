#[tokio::main]
async fn main() -> anyhow::Result<()> {
    persephone_elan_recognizer::run().await
}
