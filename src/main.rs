fn main() {
    if let Err(err) = warehouse_ingest::cli::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
