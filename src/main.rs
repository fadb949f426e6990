#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = course_evals::run().await {
        eprintln!("course-evals fatal: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}
