#[tokio::main]
async fn main() {
    workspace_backend::run().await;
}
