//! Descriptive names for the single-byte header codes.
//!
//! Every lookup is total: codes missing from a table fall through to an
//! "Unknown ..." string, since new codes are assigned upstream over time.

use chrono::DateTime;

pub const UNKNOWN_OS: &str = "Unknown operating system";
pub const UNKNOWN_ARCH: &str = "Unknown architecture";
pub const UNKNOWN_TYPE: &str = "Unknown image type";
pub const UNKNOWN_COMP: &str = "Unknown compression";

pub fn os_name(code: u8) -> &'static str {
    match code {
        0 => "Invalid OS",
        1 => "OpenBSD",
        2 => "NetBSD",
        3 => "FreeBSD",
        4 => "4.4BSD",
        5 => "Linux",
        6 => "SVR4",
        7 => "Esix",
        8 => "Solaris",
        9 => "Irix",
        10 => "SCO",
        11 => "Dell",
        12 => "NCR",
        13 => "LynxOS",
        14 => "VxWorks",
        15 => "pSOS",
        16 => "QNX",
        17 => "Firmware",
        18 => "RTEMS",
        19 => "ARTOS",
        20 => "Unity OS",
        21 => "INTEGRITY",
        22 => "OSE",
        23 => "Plan 9",
        24 => "OpenRTOS",
        _ => UNKNOWN_OS,
    }
}

pub fn arch_name(code: u8) -> &'static str {
    match code {
        0 => "Invalid CPU",
        1 => "Alpha",
        2 => "ARM",
        3 => "Intel x86",
        4 => "IA64",
        5 => "MIPS",
        6 => "MIPS 64 Bit",
        7 => "PowerPC",
        8 => "IBM S390",
        9 => "SuperH",
        10 => "Sparc",
        11 => "Sparc 64 Bit",
        12 => "M68K",
        // 13 is unassigned upstream
        14 => "MicroBlaze",
        15 => "Nios-II",
        16 => "Blackfin",
        17 => "AVR32",
        18 => "STMicroelectronics ST200",
        19 => "Sandbox architecture (test only)",
        20 => "ANDES Technology - NDS32",
        21 => "OpenRISC 1000",
        22 => "ARM64",
        23 => "Synopsys DesignWare ARC",
        24 => "AMD x86_64, Intel and Via",
        _ => UNKNOWN_ARCH,
    }
}

pub fn type_name(code: u8) -> &'static str {
    match code {
        0 => "Invalid Image",
        1 => "Standalone Program",
        2 => "OS Kernel Image",
        3 => "RAMDisk Image",
        4 => "Multi-File Image",
        5 => "Firmware Image",
        6 => "Script file",
        7 => "Filesystem Image (any type)",
        8 => "Binary Flat Device Tree Blob",
        9 => "Kirkwood Boot Image",
        10 => "Freescale IMXBoot Image",
        11 => "Davinci UBL Image",
        12 => "TI OMAP Config Header Image",
        13 => "TI Davinci AIS Image",
        14 => "OS Kernel Image, can run from any load address",
        15 => "Freescale PBL Boot Image",
        16 => "Freescale MXSBoot Image",
        17 => "TI Keystone GPHeader Image",
        18 => "ATMEL ROM bootable Image",
        19 => "Altera SOCFPGA Preloader",
        20 | 21 => "x86 setup.bin Image",
        22 => "A list of typeless images",
        23 => "Rockchip Boot Image",
        24 => "Rockchip SD card",
        25 => "Rockchip SPI image",
        26 => "Xilinx Zynq Boot Image",
        _ => UNKNOWN_TYPE,
    }
}

pub fn compression_name(code: u8) -> &'static str {
    match code {
        0 => "No compression used",
        1 => "Gzip compression used",
        2 => "Bzip2 compression used",
        3 => "Lzma compression used",
        4 => "Lzo compression used",
        5 => "Lz4 compression used",
        _ => UNKNOWN_COMP,
    }
}

/// Formats a Unix timestamp as `YYYY-MM-DD HH:MM:SS UTC`.
pub fn timestamp(secs: u32) -> String {
    match DateTime::from_timestamp(i64::from(secs), 0) {
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        None => format!("{secs} (out of range)"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_codes() {
        assert_eq!(os_name(5), "Linux");
        assert_eq!(os_name(24), "OpenRTOS");
        assert_eq!(arch_name(2), "ARM");
        assert_eq!(arch_name(22), "ARM64");
        assert_eq!(type_name(2), "OS Kernel Image");
        assert_eq!(type_name(26), "Xilinx Zynq Boot Image");
        assert_eq!(compression_name(0), "No compression used");
        assert_eq!(compression_name(1), "Gzip compression used");
    }

    #[test]
    fn arch_13_stays_unassigned() {
        assert_eq!(arch_name(12), "M68K");
        assert_eq!(arch_name(13), UNKNOWN_ARCH);
        assert_eq!(arch_name(14), "MicroBlaze");
    }

    #[test]
    fn every_byte_has_a_name() {
        for code in 0..=u8::MAX {
            assert!(!os_name(code).is_empty());
            assert!(!arch_name(code).is_empty());
            assert!(!type_name(code).is_empty());
            assert!(!compression_name(code).is_empty());
        }
        assert_eq!(os_name(25), UNKNOWN_OS);
        assert_eq!(arch_name(25), UNKNOWN_ARCH);
        assert_eq!(type_name(27), UNKNOWN_TYPE);
        assert_eq!(compression_name(6), UNKNOWN_COMP);
        assert_eq!(compression_name(255), UNKNOWN_COMP);
    }

    #[test]
    fn timestamps_are_utc() {
        assert_eq!(timestamp(0), "1970-01-01 00:00:00 UTC");
        assert_eq!(timestamp(1_468_480_000), "2016-07-14 07:06:40 UTC");
        assert_eq!(timestamp(u32::MAX), "2106-02-07 06:28:15 UTC");
    }
}
