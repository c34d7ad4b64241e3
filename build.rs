fn main() {
    // Only the firmware build links against ESP-IDF; host builds (unit tests)
    // have no ESP-IDF environment to forward.
    if std::env::var("CARGO_CFG_TARGET_OS").as_deref() == Ok("espidf") {
        embuild::espidf::sysenv::output();
    }
}
