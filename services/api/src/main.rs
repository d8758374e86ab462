use gift_entry_api::run;

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("gift entry error: {err}");
        std::process::exit(1);
    }
}
