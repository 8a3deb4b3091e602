#[tokio::main]
async fn main() -> anyhow::Result<()> {
    quint_server::run().await
}
