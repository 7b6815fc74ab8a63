use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    corral_cli::run().await
}
