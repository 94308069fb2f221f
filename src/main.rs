fn main() {
    if let Err(e) = fatex::cli::run() {
        eprintln!("fatex: error: {e:#}");
        // Non-zero exit so shells and build scripts see the failure.
        std::process::exit(1);
    }
}
