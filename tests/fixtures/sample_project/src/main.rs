//! Sample Rust file for testing

fn main() {
    println!("Hello from sample project!");
}
