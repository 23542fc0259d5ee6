use noters_client::ui::io;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    io::run().await;
}
