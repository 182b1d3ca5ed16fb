use essa_api::run;

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("essa error: {err}");
        std::process::exit(1);
    }
}
