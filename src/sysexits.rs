//! Legacy exit status codes for system programs.
//! reference: [SYSEXITS](https://man.freebsd.org/cgi/man.cgi?query=sysexits&apropos=0&sektion=0&manpath=FreeBSD+11.2-stable&arch=default&format=html)

/// value: 69 <br>
/// A service is unavailable. Used when the home directory cannot be determined,
/// since every unit is rooted there.
pub const EX_UNAVAILABLE: i32 = 69;

/// value: 73 <br>
/// A (user specified) output file cannot be created. Used when the log directory
/// cannot be created.
pub const EX_CANTCREAT: i32 = 73;

/// value: 78 <br>
/// Something was found in an unconfigured or misconfigured state. Used when the
/// configuration file cannot be read or parsed.
pub const EX_CONFIG: i32 = 78;
