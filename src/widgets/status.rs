//! Support-ticket lifecycle codes and how each audience sees them. Members and
//! operators read the same code differently ("waiting for support" vs
//! "pending"), so there is one map per audience.

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TicketStatus {
    Pending,
    Processing,
    Replied,
    Closed,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Audience {
    #[default]
    Member,
    Admin,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StatusDisplay {
    pub label: &'static str,
    pub class: &'static str,
}

impl TicketStatus {
    pub const ALL: [Self; 4] = [Self::Pending, Self::Processing, Self::Replied, Self::Closed];

    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Processing => "PROCESSING",
            Self::Replied => "REPLIED",
            Self::Closed => "CLOSED",
        }
    }

    /// Style class; shared by both audiences.
    #[must_use]
    pub fn class(self) -> &'static str {
        match self {
            Self::Pending => "status-pending",
            Self::Processing => "status-processing",
            Self::Replied => "status-replied",
            Self::Closed => "status-closed",
        }
    }

    #[must_use]
    pub fn display(self, audience: Audience) -> StatusDisplay {
        let label = match (audience, self) {
            (Audience::Member, Self::Pending | Self::Processing) => "等待客服回覆",
            (Audience::Member, Self::Replied) => "客服已回覆",
            (Audience::Admin, Self::Pending) => "待處理",
            (Audience::Admin, Self::Processing) => "會員已回覆",
            (Audience::Admin, Self::Replied) => "已回覆",
            (_, Self::Closed) => "已結案",
        };

        StatusDisplay {
            label,
            class: self.class(),
        }
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown ticket status: {0}")]
pub struct UnknownStatus(pub String);

impl FromStr for TicketStatus {
    type Err = UnknownStatus;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let code = value.trim();
        Self::ALL
            .into_iter()
            .find(|status| status.code().eq_ignore_ascii_case(code))
            .ok_or_else(|| UnknownStatus(value.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn member_view() {
        let labels: Vec<&str> = TicketStatus::ALL
            .iter()
            .map(|status| status.display(Audience::Member).label)
            .collect();
        assert_eq!(labels, vec!["等待客服回覆", "等待客服回覆", "客服已回覆", "已結案"]);
    }

    #[test]
    fn admin_view() {
        let labels: Vec<&str> = TicketStatus::ALL
            .iter()
            .map(|status| status.display(Audience::Admin).label)
            .collect();
        assert_eq!(labels, vec!["待處理", "會員已回覆", "已回覆", "已結案"]);
    }

    #[test]
    fn classes_do_not_depend_on_audience() {
        for status in TicketStatus::ALL {
            assert_eq!(
                status.display(Audience::Member).class,
                status.display(Audience::Admin).class
            );
        }
        assert_eq!(TicketStatus::Processing.class(), "status-processing");
    }

    #[test]
    fn parses_codes() {
        assert_eq!("REPLIED".parse(), Ok(TicketStatus::Replied));
        assert_eq!(" closed ".parse(), Ok(TicketStatus::Closed));
        assert_eq!(
            "ARCHIVED".parse::<TicketStatus>(),
            Err(UnknownStatus("ARCHIVED".to_string()))
        );
    }

    #[test]
    fn serde_uses_wire_codes() {
        let status: TicketStatus = serde_json::from_str("\"PROCESSING\"").unwrap();
        assert_eq!(status, TicketStatus::Processing);
        assert_eq!(serde_json::to_string(&TicketStatus::Pending).unwrap(), "\"PENDING\"");
    }
}
