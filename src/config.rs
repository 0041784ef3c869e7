//! Configuration for kernel collection rebuilds.
//!
//! Every fixed path and flag the tools are driven with lives here as a named
//! field. The defaults describe a stock Apple silicon macOS install; the CLI
//! overrides individual fields and tests point them at temp directories.

use std::path::PathBuf;

/// Extension excluded from the rebuilt collection by default.
pub const DEFAULT_EXCLUDED_KEXT: &str = "com.apple.driver.AppleSerialShim";

/// Where the rebuilt boot collection is written.
pub const DEFAULT_KC_OUTPUT: &str = "/Library/KernelCollections/kc.noshim.macho";

/// The boot collection shipped with the OS, inspected for its kext list.
pub const DEFAULT_BOOT_KC: &str = "/System/Library/KernelCollections/BootKernelExtensions.kc";

/// Directory holding `kernel.<variant>.<soc>` binaries.
pub const DEFAULT_KERNELS_DIR: &str = "/System/Library/Kernels";

/// Appended to the KC output path to name the installer script.
pub const INSTALLER_SUFFIX: &str = ".installer.sh";

/// Kernel collection rebuild configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KcConfig {
    /// Existing boot KC to inspect.
    pub boot_kc: PathBuf,
    /// Rebuilt KC output path.
    pub kc_output: PathBuf,
    /// Collection type passed to `kmutil create -n`.
    pub collection: String,
    /// Target architecture (`-a`).
    pub arch: String,
    /// Build variant (`-V`), also used in the kernel file name.
    pub variant: String,
    /// Directory containing kernel binaries.
    pub kernels_dir: PathBuf,
    /// Extension search roots (`-r`), in order.
    pub search_roots: Vec<PathBuf>,
    /// Bundle identifier to leave out of the new collection.
    pub exclude: String,
}

impl Default for KcConfig {
    fn default() -> Self {
        Self {
            boot_kc: PathBuf::from(DEFAULT_BOOT_KC),
            kc_output: PathBuf::from(DEFAULT_KC_OUTPUT),
            collection: "boot".to_string(),
            arch: "arm64e".to_string(),
            variant: "release".to_string(),
            kernels_dir: PathBuf::from(DEFAULT_KERNELS_DIR),
            search_roots: vec![
                PathBuf::from("/System/Library/Extensions"),
                PathBuf::from("/System/Library/DriverExtensions"),
            ],
            exclude: DEFAULT_EXCLUDED_KEXT.to_string(),
        }
    }
}

impl KcConfig {
    /// Kernel binary for a SoC tag, e.g. `/System/Library/Kernels/kernel.release.t8103`.
    pub fn kernel_path(&self, soc: &str) -> PathBuf {
        let name = format!("kernel.{}.{}", self.variant, soc);
        self.kernels_dir.join(name)
    }

    /// Installer script path: the KC output path plus [`INSTALLER_SUFFIX`].
    pub fn installer_path(&self) -> PathBuf {
        let mut path = self.kc_output.clone().into_os_string();
        path.push(INSTALLER_SUFFIX);
        PathBuf::from(path)
    }

    /// Print configuration for debugging.
    pub fn print(&self) {
        println!("Configuration:");
        println!("  Boot KC:        {}", self.boot_kc.display());
        println!("  KC output:      {}", self.kc_output.display());
        println!("  Installer:      {}", self.installer_path().display());
        println!("  Collection:     {}", self.collection);
        println!("  Architecture:   {}", self.arch);
        println!("  Variant:        {}", self.variant);
        println!("  Kernels dir:    {}", self.kernels_dir.display());
        for root in &self.search_roots {
            println!("  Search root:    {}", root.display());
        }
        println!("  Excluded kext:  {}", self.exclude);
    }
}
