//! Sample data seeding.
//!
//! Runs before the listener binds (when `NIGHTHAWK_SEED_ON_STARTUP` is on)
//! and on demand via `nh-cli seed`. Every step is find-or-create, so the
//! seeder can be re-run against a populated database.

use rand::Rng;
use rand::seq::IndexedRandom;
use sqlx::PgPool;
use tracing::{info, instrument, warn};

use nighthawk_core::{OrderEntry, OrderHistory};

use crate::models::{CustomerDraft, parse_api_date};
use crate::services::{CustomerService, JokeService, ServiceError};

/// Date key of the order recorded for each seeded customer.
pub const SEED_ORDER_DATE: &str = "2023-12-17";

/// Membership given to each seeded customer.
pub const SEED_MEMBERSHIP: &str = "Standard membership";

/// Products and unit prices used for seeded orders.
pub const PRICE_LIST: &[(&str, f64)] = &[
    ("Carrots", 10.0),
    ("Spatula", 20.0),
    ("Pans", 45.0),
    ("Eggs", 9.0),
    ("Pistachios", 11.0),
    ("Moon Cakes", 25.0),
    ("Beef", 55.0),
];

/// A customer inserted by the seeder.
#[derive(Debug, Clone, Copy)]
pub struct SampleCustomer {
    pub name: &'static str,
    pub email: &'static str,
    pub password: &'static str,
    /// `MM-dd-yyyy`
    pub last_visited: &'static str,
}

pub const SAMPLE_CUSTOMERS: &[SampleCustomer] = &[
    SampleCustomer {
        name: "Thomas Edison",
        email: "toby@gmail.com",
        password: "123Toby!",
        last_visited: "01-01-1840",
    },
    SampleCustomer {
        name: "Alexander Graham Bell",
        email: "lexb@gmail.com",
        password: "123LexB!",
        last_visited: "01-01-1845",
    },
    SampleCustomer {
        name: "Nikola Tesla",
        email: "niko@gmail.com",
        password: "123Niko!",
        last_visited: "01-01-1850",
    },
    SampleCustomer {
        name: "Madam Currie",
        email: "madam@gmail.com",
        password: "123Madam!",
        last_visited: "01-01-1860",
    },
    SampleCustomer {
        name: "John Mortensen",
        email: "jm1021@gmail.com",
        password: "123Qwerty!",
        last_visited: "10-21-1959",
    },
];

pub const SAMPLE_JOKES: &[&str] = &[
    "If you give someone a program, you will frustrate them for a day; if you teach them how to program, you will frustrate them for a lifetime.",
    "Q: Why did I divide sin by tan? A: Just cos.",
    "UNIX is basically a simple operating system, but you have to be a genius to understand the simplicity.",
    "Enter any 11-digit prime number to continue.",
    "If at first you don't succeed; call it version 1.0.",
    "Java programmers are some of the most materialistic people I know, very object-oriented",
    "The oldest computer can be traced back to Adam and Eve. It was an apple but with extremely limited memory. Just 1 byte. And then everything crashed.",
    "Q: Why did Wi-Fi and the computer get married? A: Because they had a connection",
    "Bill Gates teaches a kindergarten class to count to ten. 1, 2, 3, 3.1, 95, 98, ME, 2000, XP, Vista, 7, 8, 10.",
    "Q: What's a aliens favorite computer key? A: the space bar!",
    "There are 10 types of people in the world: those who understand binary, and those who don't.",
    "If it wasn't for C, we'd all be programming in BASI and OBOL.",
    "Computers make very fast, very accurate mistakes.",
    "Q: Why is it that programmers always confuse Halloween with Christmas? A: Because 31 OCT = 25 DEC.",
    "Q: How many programmers does it take to change a light bulb? A: None. It's a hardware problem.",
    "The programmer got stuck in the shower because the instructions on the shampoo bottle said: Lather, Rinse, Repeat.",
    "Q: What is the biggest lie in the entire universe? A: I have read and agree to the Terms and Conditions.",
    "An SQL statement walks into a bar and sees two tables. It approaches, and asks may I join you?",
];

/// Counts produced by a seeding run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub customers_inserted: usize,
    pub customers_skipped: usize,
    pub jokes_inserted: usize,
    pub jokes_skipped: usize,
}

/// Populates the fixed sample rows that are not yet present.
pub struct Seeder<'a> {
    customers: CustomerService<'a>,
    jokes: JokeService<'a>,
}

impl<'a> Seeder<'a> {
    /// Create a seeder over the given pool.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            customers: CustomerService::new(pool),
            jokes: JokeService::new(pool),
        }
    }

    /// Insert missing jokes and customers.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError` if a query fails. Rows inserted before the
    /// failure stay in place; re-running picks up where it stopped.
    #[instrument(skip(self))]
    pub async fn run(&self) -> Result<SeedReport, ServiceError> {
        let mut report = SeedReport::default();

        for text in SAMPLE_JOKES {
            if self.jokes.add_if_absent(text).await? {
                report.jokes_inserted += 1;
            } else {
                report.jokes_skipped += 1;
            }
        }

        for sample in SAMPLE_CUSTOMERS {
            if self.seed_customer(sample).await? {
                report.customers_inserted += 1;
            } else {
                report.customers_skipped += 1;
            }
        }

        info!(
            customers_inserted = report.customers_inserted,
            customers_skipped = report.customers_skipped,
            jokes_inserted = report.jokes_inserted,
            jokes_skipped = report.jokes_skipped,
            "Seeding complete"
        );
        Ok(report)
    }

    /// Insert one sample customer unless a name or email match exists.
    async fn seed_customer(&self, sample: &SampleCustomer) -> Result<bool, ServiceError> {
        if !self.customers.list(sample.name, sample.email).await?.is_empty() {
            return Ok(false);
        }

        let Some(draft) = sample_draft(sample) else {
            warn!(email = sample.email, "Skipping invalid sample customer");
            return Ok(false);
        };
        let history = sample_history(&mut rand::rng());

        let customer = match self
            .customers
            .create_member(&draft, &history, SEED_MEMBERSHIP)
            .await
        {
            Ok(customer) => customer,
            Err(ServiceError::DuplicateEmail(_)) => return Ok(false),
            Err(e) => return Err(e),
        };

        info!(customer_id = %customer.id, email = sample.email, "Seeded customer");
        Ok(true)
    }
}

/// Validate a sample customer into a draft.
fn sample_draft(sample: &SampleCustomer) -> Option<CustomerDraft> {
    let last_visited = parse_api_date(sample.last_visited).ok();
    CustomerDraft::new(sample.email, sample.password, sample.name, last_visited).ok()
}

/// An order history holding one random order dated [`SEED_ORDER_DATE`].
pub fn sample_history<R: Rng>(rng: &mut R) -> OrderHistory {
    let mut history = OrderHistory::new();
    history.upsert(SEED_ORDER_DATE, random_order(rng));
    history
}

/// A random product from [`PRICE_LIST`] with its price and a quantity of 1 to 5.
pub fn random_order<R: Rng>(rng: &mut R) -> OrderEntry {
    let (product, price) = PRICE_LIST.choose(rng).copied().unwrap_or(("Eggs", 9.0));
    let quantity: i64 = rng.random_range(1..=5);

    let mut entry = OrderEntry::new();
    entry.insert("product", product);
    entry.insert("price", price);
    entry.insert("quantity", quantity);
    entry
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashSet;

    use nighthawk_core::AttributeValue;

    use super::*;

    #[test]
    fn test_every_sample_customer_is_valid() {
        for sample in SAMPLE_CUSTOMERS {
            let draft = sample_draft(sample).unwrap();
            assert!(draft.last_visited.is_some(), "{} date", sample.email);
        }
    }

    #[test]
    fn test_sample_jokes_are_unique_ignoring_case() {
        let lowered: HashSet<String> = SAMPLE_JOKES.iter().map(|j| j.to_lowercase()).collect();
        assert_eq!(lowered.len(), SAMPLE_JOKES.len());
    }

    #[test]
    fn test_random_order_uses_price_list() {
        let mut rng = rand::rng();
        for _ in 0..50 {
            let entry = random_order(&mut rng);
            let Some(AttributeValue::Text(product)) = entry.get("product") else {
                panic!("product missing");
            };
            let (_, expected_price) = PRICE_LIST.iter().find(|(p, _)| p == product).unwrap();
            assert_eq!(entry.get("price"), Some(&AttributeValue::Decimal(*expected_price)));

            let Some(AttributeValue::Integer(quantity)) = entry.get("quantity") else {
                panic!("quantity missing");
            };
            assert!((1..=5).contains(quantity));
        }
    }

    #[test]
    fn test_sample_history_is_dated() {
        let history = sample_history(&mut rand::rng());
        assert_eq!(history.len(), 1);
        assert!(history.get(SEED_ORDER_DATE).is_some());
    }
}
