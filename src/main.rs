#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    improv_coach::run().await
}
