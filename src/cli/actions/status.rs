use crate::widgets::{status::StatusDisplay, Audience, TicketStatus};
use anyhow::Result;

#[derive(Debug)]
pub struct Args {
    pub code: String,
    pub audience: Audience,
}

/// # Errors
/// Returns an error for unknown status codes.
pub fn lookup(args: &Args) -> Result<(TicketStatus, StatusDisplay)> {
    let status: TicketStatus = args.code.parse()?;
    Ok((status, status.display(args.audience)))
}

/// Execute the status action.
/// # Errors
/// Returns an error for unknown status codes.
pub fn execute(args: &Args) -> Result<()> {
    let (status, display) = lookup(args)?;
    println!("{status}\t{}\t{}", display.label, display.class);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup() {
        let args = Args {
            code: " processing ".to_string(),
            audience: Audience::Admin,
        };
        let (status, display) = lookup(&args).unwrap();
        assert_eq!(status, TicketStatus::Processing);
        assert_eq!(display.label, "會員已回覆");
        assert_eq!(display.class, "status-processing");
    }

    #[test]
    fn test_lookup_unknown() {
        let args = Args {
            code: "ARCHIVED".to_string(),
            audience: Audience::Member,
        };
        let err = lookup(&args).unwrap_err();
        assert!(err.to_string().contains("ARCHIVED"));
    }
}
