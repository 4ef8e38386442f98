fn main() {
    println!("cargo:rerun-if-changed=config/generator.json");

    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
