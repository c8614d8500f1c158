//! Query results with every failure folded into "no answer".

/// Result of one DNS query.
///
/// `Empty` covers NXDOMAIN, NODATA, timeouts, exhausted lifetime and any other
/// resolver error alike. The cause is logged at debug level and then dropped:
/// the survey treats "could not find out" and "does not exist" the same way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DnsAnswer<T> {
    Answer(Vec<T>),
    Empty,
}

impl<T> DnsAnswer<T> {
    /// `Answer` for a non-empty record list, `Empty` otherwise.
    pub fn from_records(records: Vec<T>) -> Self {
        if records.is_empty() {
            DnsAnswer::Empty
        } else {
            DnsAnswer::Answer(records)
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, DnsAnswer::Empty)
    }

    pub fn records(&self) -> &[T] {
        match self {
            DnsAnswer::Answer(records) => records,
            DnsAnswer::Empty => &[],
        }
    }

    pub fn into_records(self) -> Vec<T> {
        match self {
            DnsAnswer::Answer(records) => records,
            DnsAnswer::Empty => Vec::new(),
        }
    }
}

/// Target of an SRV record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SrvTarget {
    pub target: String,
    pub port: u16,
}

impl SrvTarget {
    pub fn new(target: impl Into<String>, port: u16) -> Self {
        SrvTarget {
            target: target.into(),
            port,
        }
    }
}
