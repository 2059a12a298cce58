fn main() {
    if let Err(err) = scenario_flow::run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
