#[tokio::main]
async fn main() -> anyhow::Result<()> {
    show_booking_lib::run().await
}
