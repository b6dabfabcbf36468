use chrono::NaiveDate;
use skyhold_booking::PassengerDetails;
use skyhold_core::{PaymentDetails, PriceRange};
use skyhold_shared::{FlightDraft, FlightId, Masked};
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("Unknown command '{0}'. Type 'help' for a list of commands")]
    Unknown(String),

    #[error("Usage: {0}")]
    Usage(&'static str),

    #[error("Invalid value: {0}")]
    InvalidValue(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterCommand {
    From(Option<String>),
    To(Option<String>),
    Date(Option<NaiveDate>),
    Price(Option<PriceRange>),
    Clear,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdminCommand {
    List,
    Add(FlightDraft),
    Update(FlightId, FlightDraft),
    Delete(FlightId),
}

/// One line of shell input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Login { email: String, password: Masked<String> },
    Register { name: String, email: String, password: Masked<String> },
    Logout,
    List,
    Search(String),
    Filter(FilterCommand),
    Book(FlightId),
    Reserve,
    Details(PassengerDetails),
    Pay(PaymentDetails),
    Status,
    Back,
    Admin(AdminCommand),
    Help,
    Quit,
}

pub const HELP: &str = "\
Commands:
  login <email> <password>            sign in
  register <email> <password> <name>  create an account
  logout                              sign out
  list                                show flights matching the current search
  search [term]                       set (or clear) the search term
  filter from|to <city>               filter by departure or arrival city
  filter date <YYYY-MM-DD>            filter by departure date
  filter price low|medium|high|any    filter by price range
  filter clear                        remove every filter
  book <flight-id>                    open the booking page for a flight
  reserve                             hold a seat for the open booking
  details <first> <last> <email> <phone> <date-of-birth>
  pay <card> <expiry> <cvv> <cardholder name>
  status                              show the booking summary
  back                                leave the booking page
  admin list|add <json>|update <id> <json>|delete <id>
  help                                show this text
  quit                                exit";

impl FromStr for Command {
    type Err = ParseError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (head, rest) = split_word(line);

        match head.to_ascii_lowercase().as_str() {
            "login" => match words(rest).as_slice() {
                [email, password] => Ok(Command::Login {
                    email: email.to_string(),
                    password: Masked::from(*password),
                }),
                _ => Err(ParseError::Usage("login <email> <password>")),
            },
            "register" => {
                let (email, rest) = split_word(rest);
                let (password, name) = split_word(rest);
                if email.is_empty() || password.is_empty() || name.is_empty() {
                    return Err(ParseError::Usage("register <email> <password> <name>"));
                }
                Ok(Command::Register {
                    name: name.to_string(),
                    email: email.to_string(),
                    password: Masked::from(password),
                })
            }
            "logout" => Ok(Command::Logout),
            "list" | "ls" => Ok(Command::List),
            "search" => Ok(Command::Search(rest.to_string())),
            "filter" => parse_filter(rest).map(Command::Filter),
            "book" => match words(rest).as_slice() {
                [id] => Ok(Command::Book(FlightId::from(*id))),
                _ => Err(ParseError::Usage("book <flight-id>")),
            },
            "reserve" => Ok(Command::Reserve),
            "details" => match words(rest).as_slice() {
                [first, last, email, phone, dob] => Ok(Command::Details(PassengerDetails {
                    first_name: first.to_string(),
                    last_name: last.to_string(),
                    email: Masked::from(*email),
                    phone: Masked::from(*phone),
                    date_of_birth: Masked::from(*dob),
                })),
                _ => Err(ParseError::Usage(
                    "details <first> <last> <email> <phone> <date-of-birth>",
                )),
            },
            "pay" => {
                let (card, rest) = split_word(rest);
                let (expiry, rest) = split_word(rest);
                let (cvv, name) = split_word(rest);
                if card.is_empty() || expiry.is_empty() || cvv.is_empty() || name.is_empty() {
                    return Err(ParseError::Usage("pay <card> <expiry> <cvv> <cardholder name>"));
                }
                Ok(Command::Pay(PaymentDetails {
                    card_number: Masked::from(card),
                    expiry: Masked::from(expiry),
                    cvv: Masked::from(cvv),
                    cardholder_name: name.to_string(),
                }))
            }
            "status" => Ok(Command::Status),
            "back" | "home" => Ok(Command::Back),
            "admin" => parse_admin(rest).map(Command::Admin),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" => Ok(Command::Quit),
            other => Err(ParseError::Unknown(other.to_string())),
        }
    }
}

fn parse_filter(rest: &str) -> Result<FilterCommand, ParseError> {
    const USAGE: &str = "filter from|to|date|price <value> | filter clear";

    let (field, value) = split_word(rest);
    let value = (!value.is_empty()).then(|| value.to_string());
    match field.to_ascii_lowercase().as_str() {
        "from" => Ok(FilterCommand::From(value)),
        "to" => Ok(FilterCommand::To(value)),
        "date" => value
            .map(|v| {
                NaiveDate::parse_from_str(&v, "%Y-%m-%d")
                    .map_err(|_| ParseError::InvalidValue(format!("'{}' is not a YYYY-MM-DD date", v)))
            })
            .transpose()
            .map(FilterCommand::Date),
        "price" => value
            .filter(|v| !v.eq_ignore_ascii_case("any"))
            .map(|v| v.parse::<PriceRange>().map_err(|e| ParseError::InvalidValue(e.to_string())))
            .transpose()
            .map(FilterCommand::Price),
        "clear" => Ok(FilterCommand::Clear),
        _ => Err(ParseError::Usage(USAGE)),
    }
}

fn parse_admin(rest: &str) -> Result<AdminCommand, ParseError> {
    const USAGE: &str = "admin list|add <json>|update <id> <json>|delete <id>";

    let (action, rest) = split_word(rest);
    match action.to_ascii_lowercase().as_str() {
        "list" => Ok(AdminCommand::List),
        "add" => parse_draft(rest).map(AdminCommand::Add),
        "update" => {
            let (id, json) = split_word(rest);
            if id.is_empty() {
                return Err(ParseError::Usage(USAGE));
            }
            parse_draft(json).map(|draft| AdminCommand::Update(FlightId::from(id), draft))
        }
        "delete" => match words(rest).as_slice() {
            [id] => Ok(AdminCommand::Delete(FlightId::from(*id))),
            _ => Err(ParseError::Usage(USAGE)),
        },
        _ => Err(ParseError::Usage(USAGE)),
    }
}

fn parse_draft(json: &str) -> Result<FlightDraft, ParseError> {
    serde_json::from_str(json).map_err(|e| ParseError::InvalidValue(format!("flight JSON: {}", e)))
}

/// First whitespace-delimited word and the trimmed remainder.
fn split_word(s: &str) -> (&str, &str) {
    let s = s.trim();
    match s.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (s, ""),
    }
}

fn words(s: &str) -> Vec<&str> {
    s.split_whitespace().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_session_commands() {
        assert_eq!(
            "login jane@example.com pw".parse::<Command>().unwrap(),
            Command::Login {
                email: "jane@example.com".to_string(),
                password: Masked::from("pw"),
            }
        );
        assert_eq!(
            "register jane@example.com pw Jane Roe".parse::<Command>().unwrap(),
            Command::Register {
                name: "Jane Roe".to_string(),
                email: "jane@example.com".to_string(),
                password: Masked::from("pw"),
            }
        );
        assert_eq!(
            "login jane@example.com".parse::<Command>(),
            Err(ParseError::Usage("login <email> <password>"))
        );
    }

    #[test]
    fn test_parse_search_and_filters() {
        assert_eq!("search new york".parse::<Command>().unwrap(), Command::Search("new york".to_string()));
        assert_eq!("search".parse::<Command>().unwrap(), Command::Search(String::new()));
        assert_eq!(
            "filter to Los Angeles".parse::<Command>().unwrap(),
            Command::Filter(FilterCommand::To(Some("Los Angeles".to_string())))
        );
        assert_eq!(
            "filter from".parse::<Command>().unwrap(),
            Command::Filter(FilterCommand::From(None))
        );
        assert_eq!(
            "filter date 2024-02-15".parse::<Command>().unwrap(),
            Command::Filter(FilterCommand::Date(NaiveDate::from_ymd_opt(2024, 2, 15)))
        );
        assert_eq!(
            "filter price MEDIUM".parse::<Command>().unwrap(),
            Command::Filter(FilterCommand::Price(Some(PriceRange::Medium)))
        );
        assert!(matches!(
            "filter date tomorrow".parse::<Command>(),
            Err(ParseError::InvalidValue(_))
        ));
        assert_eq!(
            "filter price any".parse::<Command>().unwrap(),
            Command::Filter(FilterCommand::Price(None))
        );
        assert_eq!(
            "filter price Any".parse::<Command>().unwrap(),
            Command::Filter(FilterCommand::Price(None))
        );
        assert!(matches!(
            "filter price cheap".parse::<Command>(),
            Err(ParseError::InvalidValue(_))
        ));
    }

    #[test]
    fn test_parse_booking_commands() {
        assert_eq!("book 1".parse::<Command>().unwrap(), Command::Book(FlightId::from("1")));
        assert_eq!("  RESERVE ".parse::<Command>().unwrap(), Command::Reserve);

        let Command::Details(details) = "details Jane Roe jane@example.com 555-0100 1990-04-01"
            .parse::<Command>()
            .unwrap()
        else {
            panic!("expected details");
        };
        assert_eq!(details.full_name(), "Jane Roe");
        assert_eq!(details.date_of_birth.expose(), "1990-04-01");

        let Command::Pay(payment) = "pay 4242424242424242 12/30 123 Jane Q Roe".parse::<Command>().unwrap() else {
            panic!("expected pay");
        };
        assert_eq!(payment.cardholder_name, "Jane Q Roe");
        assert_eq!(payment.cvv.expose(), "123");
        assert!(matches!("pay 4242".parse::<Command>(), Err(ParseError::Usage(_))));
    }

    #[test]
    fn test_parse_admin_commands() {
        let json = r#"{"name":"ZZ1","airline":"Test Air",
            "departure":{"airport":"BOS","city":"Boston","time":"09:00:00","date":"2024-03-01"},
            "arrival":{"airport":"DEN","city":"Denver","time":"12:00:00","date":"2024-03-01"},
            "duration":"5h 0m","price":250,"totalSeats":100,"aircraft":"Airbus A321"}"#
            .replace('\n', " ");

        let Command::Admin(AdminCommand::Update(id, draft)) =
            format!("admin update 2 {}", json).parse::<Command>().unwrap()
        else {
            panic!("expected admin update");
        };
        assert_eq!(id, FlightId::from("2"));
        assert_eq!(draft.total_seats, 100);
        assert_eq!(draft.arrival.city, "Denver");

        assert_eq!(
            "admin delete 3".parse::<Command>().unwrap(),
            Command::Admin(AdminCommand::Delete(FlightId::from("3")))
        );
        assert!(matches!("admin add {".parse::<Command>(), Err(ParseError::InvalidValue(_))));
    }

    #[test]
    fn test_unknown_command() {
        assert_eq!(
            "fly away".parse::<Command>(),
            Err(ParseError::Unknown("fly".to_string()))
        );
    }
}
