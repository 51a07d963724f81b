fn main() {
    if let Err(err) = hypergraph_layout::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
