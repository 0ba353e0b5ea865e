#[tokio::main]
async fn main() {
    journal::boot::boot().await;
}
