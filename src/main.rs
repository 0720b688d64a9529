fn main() {
    if let Err(err) = fsm_layout::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
