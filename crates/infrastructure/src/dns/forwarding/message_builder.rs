//! DNS Message Builder
//!
//! Bridges resolver responses and DNS wire messages using `hickory-proto`:
//! question messages for a query, reply messages carrying the answers a
//! resolver chain produced.

use super::record_type_map::RecordTypeMapper;
use hickory_proto::op::{Message, MessageType, OpCode, Query, ResponseCode};
use hickory_proto::rr::rdata::{A, AAAA, CNAME, PTR, SRV, TXT};
use hickory_proto::rr::{DNSClass, Name, RData, Record};
use hickory_proto::serialize::binary::{BinEncodable, BinEncoder};
use splitdns_application::ports::{DnsResponse, ResponseKind};
use splitdns_domain::{DomainError, RecordData, RecordType, ResourceRecord};
use std::str::FromStr;

/// Builds DNS messages
pub struct MessageBuilder;

impl MessageBuilder {
    /// Build a standard recursive query (RD set, single question).
    pub fn build_query(
        id: u16,
        domain: &str,
        record_type: &RecordType,
    ) -> Result<Message, DomainError> {
        let name = Self::parse_name(domain)
            .map_err(|e| DomainError::InvalidDomainName(format!("Invalid domain '{}': {}", domain, e)))?;

        let mut query = Query::new();
        query.set_name(name);
        query.set_query_type(RecordTypeMapper::to_hickory(record_type));
        query.set_query_class(DNSClass::IN);

        let mut message = Message::new(id, MessageType::Query, OpCode::Query);
        message.set_recursion_desired(true);
        message.add_query(query);
        Ok(message)
    }

    /// Build the reply to `request` carrying `response`'s answers.
    ///
    /// Locally answered responses are authoritative. An empty answer list is
    /// a NOERROR/NODATA reply.
    pub fn build_response(request: &Message, response: &DnsResponse) -> Result<Message, DomainError> {
        let mut message = Message::new(request.id(), MessageType::Response, OpCode::Query);
        message.set_recursion_desired(request.recursion_desired());
        message.set_recursion_available(true);
        message.set_authoritative(response.kind == ResponseKind::CustomDns);
        message.set_response_code(ResponseCode::NoError);

        for query in request.queries() {
            message.add_query(query.clone());
        }
        for answer in &response.answers {
            message.add_answer(Self::to_record(answer)?);
        }

        Ok(message)
    }

    /// Convert one synthesized answer to a hickory record.
    pub fn to_record(record: &ResourceRecord) -> Result<Record, DomainError> {
        let synthesis =
            |e: String| DomainError::AnswerSynthesis(format!("{} {}: {}", record.name, record.type_name(), e));

        let name = Self::parse_name(&record.name).map_err(synthesis)?;

        let rdata = match &record.data {
            RecordData::A(ip) => RData::A(A(*ip)),
            RecordData::AAAA(ip) => RData::AAAA(AAAA(*ip)),
            RecordData::TXT(strings) => {
                RData::TXT(TXT::new(strings.iter().map(|s| s.to_string()).collect()))
            }
            RecordData::SRV {
                priority,
                weight,
                port,
                target,
            } => RData::SRV(SRV::new(
                *priority,
                *weight,
                *port,
                Self::parse_name(target).map_err(synthesis)?,
            )),
            RecordData::CNAME(target) => {
                RData::CNAME(CNAME(Self::parse_name(target).map_err(synthesis)?))
            }
            RecordData::PTR(target) => RData::PTR(PTR(Self::parse_name(target).map_err(synthesis)?)),
            RecordData::Opaque { .. } => {
                return Err(synthesis("record type has no wire encoding here".to_string()))
            }
        };

        Ok(Record::from_rdata(name, record.ttl, rdata))
    }

    /// Serialize a Message to wire format bytes
    pub fn serialize(message: &Message) -> Result<Vec<u8>, DomainError> {
        let mut buf = Vec::with_capacity(512);
        let mut encoder = BinEncoder::new(&mut buf);

        message.emit(&mut encoder).map_err(|e| {
            DomainError::AnswerSynthesis(format!("Failed to serialize DNS message: {}", e))
        })?;

        Ok(buf)
    }

    fn parse_name(raw: &str) -> Result<Name, String> {
        let fqdn = if raw.ends_with('.') {
            raw.to_string()
        } else {
            format!("{raw}.")
        };
        Name::from_str(&fqdn).map_err(|e| e.to_string())
    }
}
