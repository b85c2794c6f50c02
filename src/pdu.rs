//! Protocol data units exchanged with the engine.
//!
//! These are already-decoded PDUs; encoding to the wire is the engine's job.

use crate::error::ErrorStatus;
use crate::oid::Oid;
use crate::tag;
use crate::varbind::VarBind;

/// PDU type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum PduType {
    GetRequest = tag::pdu::GET_REQUEST,
    GetNextRequest = tag::pdu::GET_NEXT_REQUEST,
    Response = tag::pdu::RESPONSE,
    SetRequest = tag::pdu::SET_REQUEST,
    GetBulkRequest = tag::pdu::GET_BULK_REQUEST,
}

impl PduType {
    /// Create from tag byte.
    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            tag::pdu::GET_REQUEST => Some(Self::GetRequest),
            tag::pdu::GET_NEXT_REQUEST => Some(Self::GetNextRequest),
            tag::pdu::RESPONSE => Some(Self::Response),
            tag::pdu::SET_REQUEST => Some(Self::SetRequest),
            tag::pdu::GET_BULK_REQUEST => Some(Self::GetBulkRequest),
            _ => None,
        }
    }

    /// Get the tag byte.
    pub fn tag(self) -> u8 {
        self as u8
    }
}

impl std::fmt::Display for PduType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::GetRequest => write!(f, "GetRequest"),
            Self::GetNextRequest => write!(f, "GetNextRequest"),
            Self::Response => write!(f, "Response"),
            Self::SetRequest => write!(f, "SetRequest"),
            Self::GetBulkRequest => write!(f, "GetBulkRequest"),
        }
    }
}

/// Request or response PDU.
#[derive(Debug, Clone, PartialEq)]
pub struct Pdu {
    /// PDU type
    pub pdu_type: PduType,
    /// Request ID for correlating requests and responses
    pub request_id: i32,
    /// Error status (0 for requests, error code for responses).
    /// Holds non-repeaters in a GETBULK request.
    pub error_status: i32,
    /// Error index (1-based index of problematic varbind).
    /// Holds max-repetitions in a GETBULK request.
    pub error_index: i32,
    /// Variable bindings
    pub varbinds: Vec<VarBind>,
}

impl Pdu {
    fn request(pdu_type: PduType, request_id: i32, varbinds: Vec<VarBind>) -> Self {
        Self {
            pdu_type,
            request_id,
            error_status: 0,
            error_index: 0,
            varbinds,
        }
    }

    /// Create a GET request PDU.
    pub fn get_request(request_id: i32, oids: &[Oid]) -> Self {
        let varbinds = oids.iter().cloned().map(VarBind::null).collect();
        Self::request(PduType::GetRequest, request_id, varbinds)
    }

    /// Create a GETNEXT request PDU.
    pub fn get_next_request(request_id: i32, oids: &[Oid]) -> Self {
        let varbinds = oids.iter().cloned().map(VarBind::null).collect();
        Self::request(PduType::GetNextRequest, request_id, varbinds)
    }

    /// Create a SET request PDU.
    pub fn set_request(request_id: i32, varbinds: Vec<VarBind>) -> Self {
        Self::request(PduType::SetRequest, request_id, varbinds)
    }

    /// Create a GETBULK request PDU.
    pub fn get_bulk(request_id: i32, non_repeaters: i32, max_repetitions: i32, oids: &[Oid]) -> Self {
        Self {
            pdu_type: PduType::GetBulkRequest,
            request_id,
            error_status: non_repeaters,
            error_index: max_repetitions,
            varbinds: oids.iter().cloned().map(VarBind::null).collect(),
        }
    }

    /// Create a response PDU.
    pub fn response(request_id: i32, varbinds: Vec<VarBind>) -> Self {
        Self::request(PduType::Response, request_id, varbinds)
    }

    /// Response to this request carrying an error status.
    pub fn to_error_response(&self, error_status: ErrorStatus, error_index: i32) -> Self {
        Self {
            pdu_type: PduType::Response,
            request_id: self.request_id,
            error_status: error_status.as_i32(),
            error_index,
            varbinds: self.varbinds.clone(),
        }
    }

    /// Same request without the varbinds at the given zero-based positions.
    pub fn without_positions(&self, skip: impl Fn(usize) -> bool) -> Self {
        Self {
            varbinds: self
                .varbinds
                .iter()
                .enumerate()
                .filter(|(pos, _)| !skip(*pos))
                .map(|(_, vb)| vb.clone())
                .collect(),
            ..self.clone()
        }
    }

    /// Check if this is an error response.
    pub fn is_error(&self) -> bool {
        self.error_status != 0
    }

    /// Get the error status as an enum.
    pub fn error_status_enum(&self) -> ErrorStatus {
        ErrorStatus::from_i32(self.error_status)
    }

    /// OIDs of the varbinds, in order.
    pub fn oids(&self) -> impl Iterator<Item = &Oid> {
        self.varbinds.iter().map(|vb| &vb.oid)
    }
}
