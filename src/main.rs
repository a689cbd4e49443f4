fn main() {
    risklayout::run();
}
