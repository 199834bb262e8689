//! Application metadata.

/// Application metadata passed through to the compiler and installers.
///
/// # Examples
///
/// ```no_run
/// use kodegen_bundler_installer::bundler::PackageSettings;
///
/// let package = PackageSettings {
///     app_name: "MyApp".into(),
///     version: "1.2".into(),
///     author: "Jane Doe".into(),
///     company_name: "Example Inc.".into(),
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct PackageSettings {
    /// Application name.
    ///
    /// Used verbatim in every artifact filename, so it must be path-safe.
    pub app_name: String,

    /// Dotted version string with any number of components.
    ///
    /// Example: "1.2", "2.0.1.7"
    ///
    /// Default: "0.0"
    pub version: String,

    /// Author shown by the installer.
    pub author: String,

    /// Company name written into the Windows version resource.
    pub company_name: String,

    /// Short description shown by the installer.
    pub description: String,

    /// License identifier or text.
    pub license: String,

    /// Project homepage.
    pub url: String,

    /// Icon file path.
    pub icon: String,
}

impl Default for PackageSettings {
    fn default() -> Self {
        Self {
            app_name: String::new(),
            version: "0.0".into(),
            author: String::new(),
            company_name: String::new(),
            description: String::new(),
            license: String::new(),
            url: String::new(),
            icon: String::new(),
        }
    }
}
