//! Kernel axis and button code tables
//!
//! The capability negotiation returns hardware codes (`ABS_*` for axes,
//! `BTN_*`/`KEY_*` for buttons); these tables translate them into the
//! conventional short names used by the input channels. Codes outside the
//! tables render as `unknown(0x..)` so unmapped hardware stays usable.

/// Conventional name for a kernel absolute-axis code.
pub fn axis_name(code: u8) -> Option<&'static str> {
    let name = match code {
        0x00 => "x",
        0x01 => "y",
        0x02 => "z",
        0x03 => "rx",
        0x04 => "ry",
        0x05 => "rz",
        0x06 => "throttle",
        0x07 => "rudder",
        0x08 => "wheel",
        0x09 => "gas",
        0x0a => "brake",
        0x10 => "hat0x",
        0x11 => "hat0y",
        0x12 => "hat1x",
        0x13 => "hat1y",
        0x14 => "hat2x",
        0x15 => "hat2y",
        0x16 => "hat3x",
        0x17 => "hat3y",
        0x18 => "pressure",
        0x19 => "distance",
        0x1a => "tilt_x",
        0x1b => "tilt_y",
        0x1c => "tool_width",
        0x20 => "volume",
        0x28 => "misc",
        _ => return None,
    };
    Some(name)
}

/// Conventional name for a kernel button code.
pub fn button_name(code: u16) -> Option<&'static str> {
    let name = match code {
        0x120 => "trigger",
        0x121 => "thumb",
        0x122 => "thumb2",
        0x123 => "top",
        0x124 => "top2",
        0x125 => "pinkie",
        0x126 => "base",
        0x127 => "base2",
        0x128 => "base3",
        0x129 => "base4",
        0x12a => "base5",
        0x12b => "base6",
        0x12f => "dead",
        0x130 => "a",
        0x131 => "b",
        0x132 => "c",
        0x133 => "x",
        0x134 => "y",
        0x135 => "z",
        0x136 => "tl",
        0x137 => "tr",
        0x138 => "tl2",
        0x139 => "tr2",
        0x13a => "select",
        0x13b => "start",
        0x13c => "mode",
        0x13d => "thumbl",
        0x13e => "thumbr",
        0x220 => "dpad_up",
        0x221 => "dpad_down",
        0x222 => "dpad_left",
        0x223 => "dpad_right",
        // XBox 360 pads report the dpad with these codes instead.
        0x2c0 => "dpad_left",
        0x2c1 => "dpad_right",
        0x2c2 => "dpad_up",
        0x2c3 => "dpad_down",
        _ => return None,
    };
    Some(name)
}

/// Synthesized name for an axis code missing from the table.
pub fn unknown_axis(code: u8) -> String {
    format!("unknown(0x{code:02x})")
}

/// Synthesized name for a button code missing from the table.
pub fn unknown_button(code: u16) -> String {
    format!("unknown(0x{code:03x})")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn common_codes_resolve() {
        assert_eq!(axis_name(0x01), Some("y"));
        assert_eq!(axis_name(0x02), Some("z"));
        assert_eq!(button_name(0x130), Some("a"));
        assert_eq!(button_name(0x134), Some("y"));
    }

    #[test]
    fn unknown_codes_render_hex_sentinels() {
        assert_eq!(axis_name(0x99), None);
        assert_eq!(unknown_axis(0x99), "unknown(0x99)");
        assert_eq!(unknown_button(0x2ff), "unknown(0x2ff)");
        assert_eq!(unknown_button(0x21), "unknown(0x021)");
    }
}
