use core::fmt;

/// Kernel error numbers the driver can report.
#[repr(i32)]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Errno {
    ENOMEM = 12,
    EBUSY = 16,
    EEXIST = 17,
    ENODEV = 19,
    EINVAL = 22,
}

pub type KResult<T = ()> = core::result::Result<T, Errno>;

impl Errno {
    /// The negative value returned to the kernel from init/probe.
    #[inline]
    pub const fn to_errno(self) -> i32 {
        -(self as i32)
    }

    pub const fn name(self) -> &'static str {
        match self {
            Errno::ENOMEM => "ENOMEM",
            Errno::EBUSY => "EBUSY",
            Errno::EEXIST => "EEXIST",
            Errno::ENODEV => "ENODEV",
            Errno::EINVAL => "EINVAL",
        }
    }
}

impl fmt::Display for Errno {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name(), self.to_errno())
    }
}

/// Collapse a result into the `0` / `-errno` convention of module init.
#[inline]
pub fn to_status(result: KResult) -> i32 {
    match result {
        Ok(()) => 0,
        Err(err) => err.to_errno(),
    }
}
