//! Wire tag codes for SNMP values and PDUs.
//!
//! The engine decodes BER; these are the single-byte type codes it hands
//! back alongside each value. Layout per X.690 Section 8.1.2:
//! - Bits 7-6: Class (00=Universal, 01=Application, 10=Context-specific)
//! - Bit 5: Primitive (0) or Constructed (1)
//! - Bits 4-0: Tag number

/// Tag class bits (bits 7-6)
pub mod class {
    pub const UNIVERSAL: u8 = 0x00;
    pub const APPLICATION: u8 = 0x40;
    pub const CONTEXT_SPECIFIC: u8 = 0x80;
}

/// Constructed bit (bit 5)
pub const CONSTRUCTED: u8 = 0x20;

/// Universal tags (class bits 00)
pub mod universal {
    pub const INTEGER: u8 = 0x02;
    pub const BIT_STRING: u8 = 0x03;
    pub const OCTET_STRING: u8 = 0x04;
    pub const NULL: u8 = 0x05;
    pub const OBJECT_IDENTIFIER: u8 = 0x06;
}

/// Application tags (class bits 01) - SNMP-specific types
pub mod application {
    pub const IP_ADDRESS: u8 = 0x40;
    pub const COUNTER32: u8 = 0x41;
    pub const GAUGE32: u8 = 0x42; // Also Unsigned32
    pub const TIMETICKS: u8 = 0x43;
    pub const OPAQUE: u8 = 0x44;
    pub const NSAP_ADDRESS: u8 = 0x45;
    pub const COUNTER64: u8 = 0x46;
    /// Historic UInteger32 (RFC 1442)
    pub const UINTEGER: u8 = 0x47;
}

/// Types carried inside an Opaque wrapper, as net-snmp numbers them
/// (opaque tag 0x30 plus the inner application tag).
pub mod opaque {
    pub const COUNTER64: u8 = 0x76;
    pub const FLOAT: u8 = 0x78;
    pub const DOUBLE: u8 = 0x79;
    pub const I64: u8 = 0x7A;
    pub const U64: u8 = 0x7B;
}

/// Context-specific tags (class bits 10) - Exception values
pub mod context {
    pub const NO_SUCH_OBJECT: u8 = 0x80;
    pub const NO_SUCH_INSTANCE: u8 = 0x81;
    pub const END_OF_MIB_VIEW: u8 = 0x82;
}

/// PDU tags (context-specific, constructed)
pub mod pdu {
    use super::CONSTRUCTED;
    use super::class::CONTEXT_SPECIFIC;

    pub const GET_REQUEST: u8 = CONTEXT_SPECIFIC | CONSTRUCTED; // 0xA0
    pub const GET_NEXT_REQUEST: u8 = CONTEXT_SPECIFIC | CONSTRUCTED | 0x01; // 0xA1
    pub const RESPONSE: u8 = CONTEXT_SPECIFIC | CONSTRUCTED | 0x02; // 0xA2
    pub const SET_REQUEST: u8 = CONTEXT_SPECIFIC | CONSTRUCTED | 0x03; // 0xA3
    pub const GET_BULK_REQUEST: u8 = CONTEXT_SPECIFIC | CONSTRUCTED | 0x05; // 0xA5
}

/// Get the class of a tag
#[inline]
pub const fn tag_class(tag: u8) -> u8 {
    tag & 0xC0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_classes() {
        assert_eq!(tag_class(application::COUNTER64), class::APPLICATION);
        assert_eq!(tag_class(context::END_OF_MIB_VIEW), class::CONTEXT_SPECIFIC);
        assert_eq!(tag_class(universal::OCTET_STRING), class::UNIVERSAL);
        assert_eq!(pdu::GET_BULK_REQUEST, 0xA5);
    }
}
