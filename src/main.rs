#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = school_records::run().await {
        eprintln!("school-records fatal: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}
