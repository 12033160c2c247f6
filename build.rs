fn main() {
    println!("cargo:rerun-if-env-changed=BUTTONLINK_CONFIG");

    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
