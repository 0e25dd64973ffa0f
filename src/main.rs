fn main() {
    xreq::cli::run();
}
