#[tokio::main]
async fn main() -> anyhow::Result<()> {
    mooring_monitor_lib::run().await
}
