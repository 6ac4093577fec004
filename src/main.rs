fn main() {
    std::process::exit(tabview_lib::run());
}
