/// Login credentials for platforms that gate answers behind an account.
///
/// The pair is opaque: the monitor hands it to the automation provider
/// unchanged and never inspects, transforms, or logs it. The `Debug` impl
/// redacts both fields so credentials cannot leak through error chains or
/// structured logs.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    #[must_use]
    pub fn new(email: String, password: String) -> Self {
        Self { email, password }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &"[redacted]")
            .field("password", &"[redacted]")
            .finish()
    }
}
