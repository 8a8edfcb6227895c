use crate::widgets::password::{meter, Meter, MAX_SCORE};
use secrecy::{ExposeSecret, SecretString};

#[derive(Debug)]
pub struct Args {
    pub password: SecretString,
}

#[must_use]
pub fn report(meter: &Meter) -> String {
    if meter.strength.label.is_empty() {
        format!("{}/{MAX_SCORE}", meter.score)
    } else {
        format!(
            "{}/{MAX_SCORE} {} ({})",
            meter.score, meter.strength.label, meter.strength.width
        )
    }
}

pub fn execute(args: &Args) {
    println!("{}", report(&meter(args.password.expose_secret())));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report() {
        assert_eq!(report(&meter("")), "0/4");
        assert_eq!(report(&meter("abc")), "1/4 太短 (25%)");
        assert_eq!(report(&meter("Passw0rd")), "4/4 強 (100%)");
    }
}
