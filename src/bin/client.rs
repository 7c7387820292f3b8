use std::env;
use std::fs;
use std::path::PathBuf;
use anyhow::Context;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use rand::distributions::Alphanumeric;
use rand::Rng;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Command line client of the venue booking service
#[derive(Parser, Debug)]
#[command(name = "venue-booking")]
#[command(about = "client cli used by guests and restaurant owners to interact with the booking service", version, long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Parser, Debug)]
enum Commands {
    /// log in and keep the session for later commands
    #[command(arg_required_else_help = true)]
    Login {
        #[arg(long)]
        phone: String,
        #[arg(long)]
        password: String,
    },
    /// forget the stored session
    Logout,
    /// restaurant catalog
    #[command(arg_required_else_help = true)]
    Restaurant(RestaurantArgs),
    /// per-day availability of a restaurant
    #[command(arg_required_else_help = true)]
    Calendar(CalendarArgs),
    /// request a booking
    #[command(arg_required_else_help = true)]
    Book(BookArgs),
    /// booking management
    #[command(arg_required_else_help = true)]
    Booking(BookingArgs),
    /// restaurant reviews
    #[command(arg_required_else_help = true)]
    Review(ReviewArgs),
}

#[derive(Debug, Args)]
struct RestaurantArgs {
    #[command(subcommand)]
    command: RestaurantCmds,
}

#[derive(Debug, Subcommand)]
enum RestaurantCmds {
    List {
        #[arg(long, help = "Search in name, description, location and cuisines.")]
        search: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long, value_name = "GUESTS")]
        min_capacity: Option<i32>,
        #[arg(long, value_name = "YYYY-MM-DD", help = "Hide restaurants already reserved on this date.")]
        available_on: Option<NaiveDate>,
    },
    #[command(arg_required_else_help = true)]
    Show { id: i64 },
    /// edit a restaurant you own, only the given fields change
    #[command(arg_required_else_help = true)]
    Update(UpdateArgs),
    /// delete a restaurant you own
    #[command(arg_required_else_help = true)]
    Delete { id: i64 },
    #[command(arg_required_else_help = true)]
    Images { id: i64 },
}

#[derive(Debug, Args)]
struct UpdateArgs {
    id: i64,
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    description: Option<String>,
    #[arg(long)]
    location: Option<String>,
    #[arg(long)]
    address: Option<String>,
    #[arg(long)]
    category: Option<String>,
    #[arg(long, value_parser = clap::value_parser!(i32).range(1..))]
    capacity: Option<i32>,
    #[arg(long)]
    price_range: Option<String>,
    #[arg(long)]
    contact_phone: Option<String>,
    #[arg(long)]
    contact_email: Option<String>,
}

#[derive(Debug, Args)]
struct CalendarArgs {
    restaurant_id: i64,
    #[arg(long, value_name = "YYYY-MM-DD")]
    start: Option<NaiveDate>,
    #[arg(long, value_name = "YYYY-MM-DD")]
    end: Option<NaiveDate>,
    #[arg(long, help = "Party size to classify every day against.", value_parser = clap::value_parser!(u32).range(1..))]
    guests: Option<u32>,
}

#[derive(Debug, Args)]
struct BookArgs {
    restaurant_id: i64,
    #[arg(long, value_name = "YYYY-MM-DD")]
    date: NaiveDate,
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    guests: u32,
    #[arg(long)]
    name: String,
    #[arg(long)]
    email: String,
    #[arg(long)]
    phone: String,
    #[arg(long, default_value = "banquet")]
    event_type: String,
    #[arg(long)]
    note: Option<String>,
}

#[derive(Debug, Args)]
struct BookingArgs {
    #[command(subcommand)]
    command: BookingCmds,
}

#[derive(Debug, Subcommand)]
enum BookingCmds {
    /// bookings of one restaurant, owner or admin only
    #[command(arg_required_else_help = true)]
    List {
        restaurant_id: i64,
        #[arg(long, help = "pending, confirmed or rejected")]
        status: Option<String>,
        #[arg(long, value_name = "YYYY-MM-DD")]
        from: Option<NaiveDate>,
        #[arg(long, value_name = "YYYY-MM-DD")]
        to: Option<NaiveDate>,
    },
    /// your own bookings
    Mine,
    #[command(arg_required_else_help = true)]
    Confirm { id: i64 },
    #[command(arg_required_else_help = true)]
    Reject { id: i64 },
}

#[derive(Debug, Args)]
struct ReviewArgs {
    #[command(subcommand)]
    command: ReviewCmds,
}

#[derive(Debug, Subcommand)]
enum ReviewCmds {
    #[command(arg_required_else_help = true)]
    List { restaurant_id: i64 },
    #[command(arg_required_else_help = true)]
    Add {
        restaurant_id: i64,
        #[arg(long)]
        username: String,
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=5))]
        rating: u8,
        #[arg(long)]
        comment: Option<String>,
    },
    /// answer a review of your restaurant
    #[command(arg_required_else_help = true)]
    Reply {
        review_id: i64,
        #[arg(long)]
        text: String,
    },
}

const DEFAULT_HOST: &str = "http://localhost:8080";
const SESSION_FILE: &str = ".venue-booking-session.json";
const IDEMPOTENCY_KEY_HEADER: &str = "Idempotency-Key";
const ROLE_HEADER: &str = "X-Session-Role";

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
struct SessionData {
    token: Option<String>,
    role: Option<String>,
}

/// File backed session: loaded once per command, updated on login, cleared on logout or 401.
struct SessionStore {
    path: PathBuf,
    data: SessionData,
}

impl SessionStore {
    fn default_path() -> PathBuf {
        if let Ok(path) = env::var("VENUE_BOOKING_SESSION") {
            return PathBuf::from(path);
        }
        env::var("HOME")
            .map(|home| PathBuf::from(home).join(SESSION_FILE))
            .unwrap_or_else(|_| PathBuf::from(SESSION_FILE))
    }

    fn load(path: PathBuf) -> Self {
        let data = fs::read_to_string(&path)
            .ok()
            .and_then(|raw| serde_json::from_str(&raw).ok())
            .unwrap_or_default();
        Self { path, data }
    }

    fn update(&mut self, token: String, role: String) -> Result<(), anyhow::Error> {
        self.data = SessionData {
            token: Some(token),
            role: Some(role),
        };
        let raw = serde_json::to_string(&self.data)?;
        fs::write(&self.path, raw).with_context(|| format!("failed to write session to {}", self.path.display()))
    }

    fn clear(&mut self) -> Result<(), anyhow::Error> {
        self.data = SessionData::default();
        match fs::remove_file(&self.path) {
            Err(e) if e.kind() != std::io::ErrorKind::NotFound => {
                Err(e).with_context(|| format!("failed to remove session at {}", self.path.display()))
            }
            _ => Ok(()),
        }
    }

    fn attach(&self, builder: RequestBuilder) -> RequestBuilder {
        let builder = match &self.data.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        };
        match &self.data.role {
            Some(role) => builder.header(ROLE_HEADER, role),
            None => builder,
        }
    }
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    access_token: String,
    role: String,
}

fn message_of(body: &Value) -> String {
    body["message"].as_str().unwrap_or("no details").to_string()
}

/// Print the body of a successful call, otherwise report the status like every other command.
async fn report(res: Response, session: &mut SessionStore) -> Result<Option<Value>, anyhow::Error> {
    let status = res.status();
    let body: Value = res.json().await.unwrap_or(Value::Null);
    match status {
        StatusCode::OK => Ok(Some(body)),
        StatusCode::UNAUTHORIZED => {
            session.clear()?;
            println!("session rejected by the server, please log in again");
            Ok(None)
        }
        StatusCode::FORBIDDEN => {
            println!("you are not allowed to do this");
            Ok(None)
        }
        StatusCode::NOT_FOUND => {
            println!("Resource not found");
            Ok(None)
        }
        StatusCode::BAD_REQUEST => {
            println!("Bad request, {}", message_of(&body));
            Ok(None)
        }
        unexpected => {
            println!("got unexpected status code, {}, {}", unexpected, message_of(&body));
            Ok(None)
        }
    }
}

fn print_days(body: &Value) {
    for day in body["days"].as_array().into_iter().flatten() {
        let marker = match day["classification"]["status"].as_str() {
            Some("available") => "available",
            Some("limited") => "limited capacity",
            Some("unavailable") => "fully booked",
            _ if day["is_fully_booked"].as_bool().unwrap_or(false) => "fully booked",
            _ => "",
        };
        println!(
            "{}  booked={:>4}  remaining={:>4}  {}",
            day["date"].as_str().unwrap_or("?"),
            day["booked_guest_total"],
            day["remaining_capacity"],
            marker
        );
    }
}

/// only the flags given on the command line end up in the body
fn update_body(update: &UpdateArgs) -> Value {
    let fields = [
        ("name", update.name.clone().map(Value::from)),
        ("description", update.description.clone().map(Value::from)),
        ("location", update.location.clone().map(Value::from)),
        ("address", update.address.clone().map(Value::from)),
        ("category", update.category.clone().map(Value::from)),
        ("capacity", update.capacity.map(Value::from)),
        ("price_range", update.price_range.clone().map(Value::from)),
        ("contact_phone", update.contact_phone.clone().map(Value::from)),
        ("contact_email", update.contact_email.clone().map(Value::from)),
    ];
    Value::Object(
        fields
            .into_iter()
            .filter_map(|(key, value)| value.map(|v| (key.to_string(), v)))
            .collect(),
    )
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let args = Cli::parse();
    let host = env::var("VENUE_BOOKING_HOST").unwrap_or(DEFAULT_HOST.to_string());
    let mut session = SessionStore::load(SessionStore::default_path());
    let client = Client::new();

    match args.command {
        Commands::Login { phone, password } => {
            let res = client
                .post(format!("{}/v1/auth/login", host))
                .json(&serde_json::json!({ "phone": phone, "password": password }))
                .send()
                .await?;
            match res.status() {
                StatusCode::OK => {
                    let login = res.json::<LoginResponse>().await.context("failed to read login response")?;
                    session.update(login.access_token, login.role.clone())?;
                    println!("logged in as {}", login.role);
                }
                StatusCode::UNAUTHORIZED => println!("Invalid phone or password"),
                unexpected => println!("got unexpected status code, {}", unexpected),
            }
        }
        Commands::Logout => {
            session.clear()?;
            println!("logged out");
        }
        Commands::Restaurant(restaurant) => match restaurant.command {
            RestaurantCmds::List { search, category, min_capacity, available_on } => {
                let res = client
                    .get(format!("{}/v1/restaurants", host))
                    .query(&[
                        ("search", search),
                        ("category", category),
                        ("min_capacity", min_capacity.map(|c| c.to_string())),
                        ("available_on", available_on.map(|d| d.to_string())),
                    ])
                    .send()
                    .await?;
                if let Some(body) = report(res, &mut session).await? {
                    for r in body["restaurants"].as_array().into_iter().flatten() {
                        println!("#{} {} ({}), up to {} guests", r["id"], r["name"].as_str().unwrap_or("?"), r["location"].as_str().unwrap_or("?"), r["capacity"]);
                    }
                }
            }
            RestaurantCmds::Show { id } => {
                let res = client.get(format!("{}/v1/restaurant/{}", host, id)).send().await?;
                if let Some(body) = report(res, &mut session).await? {
                    println!("{}", serde_json::to_string_pretty(&body)?);
                }
            }
            RestaurantCmds::Update(update) => {
                let res = session
                    .attach(client.put(format!("{}/v1/restaurant/{}", host, update.id)))
                    .json(&update_body(&update))
                    .send()
                    .await?;
                if let Some(body) = report(res, &mut session).await? {
                    println!("Restaurant {} updated, capacity {}", update.id, body["capacity"]);
                }
            }
            RestaurantCmds::Delete { id } => {
                let res = session.attach(client.delete(format!("{}/v1/restaurant/{}", host, id))).send().await?;
                if report(res, &mut session).await?.is_some() {
                    println!("Restaurant {} deleted", id);
                }
            }
            RestaurantCmds::Images { id } => {
                let res = client.get(format!("{}/v1/restaurant/{}/images", host, id)).send().await?;
                if let Some(body) = report(res, &mut session).await? {
                    for image in body.as_array().into_iter().flatten() {
                        println!("#{} {}", image["id"], image["url"].as_str().unwrap_or("?"));
                    }
                }
            }
        },
        Commands::Calendar(args) => {
            let res = session
                .attach(client.get(format!("{}/v1/restaurant/{}/calendar", host, args.restaurant_id)))
                .query(&[
                    ("start", args.start.map(|d| d.to_string())),
                    ("end", args.end.map(|d| d.to_string())),
                    ("guests", args.guests.map(|g| g.to_string())),
                ])
                .send()
                .await?;
            if let Some(body) = report(res, &mut session).await? {
                println!("restaurant {} with capacity {}", body["restaurant_id"], body["capacity"]);
                print_days(&body);
            }
        }
        Commands::Book(args) => {
            let key: String = rand::thread_rng().sample_iter(&Alphanumeric).take(32).map(char::from).collect();
            println!("requesting a booking at restaurant={} for {} guests on {}", args.restaurant_id, args.guests, args.date);
            let res = session
                .attach(client.post(format!("{}/v1/bookings", host)))
                .header(IDEMPOTENCY_KEY_HEADER, key)
                .json(&serde_json::json!({
                    "restaurant_id": args.restaurant_id,
                    "booking_date": args.date,
                    "booking_username": args.name,
                    "email": args.email,
                    "phone_number": args.phone,
                    "event_type": args.event_type,
                    "number_of_guests": args.guests,
                    "additional_information": args.note,
                }))
                .send()
                .await?;
            if res.status() == StatusCode::CONFLICT {
                let body: Value = res.json().await.unwrap_or(Value::Null);
                println!("Booking Failed, {}", message_of(&body));
            } else if let Some(body) = report(res, &mut session).await? {
                println!("Booking Request Submitted, id = {}. {}", body["booking"]["id"], message_of(&body));
            }
        }
        Commands::Booking(booking) => match booking.command {
            BookingCmds::List { restaurant_id, status, from, to } => {
                let res = session
                    .attach(client.get(format!("{}/v1/restaurant/{}/bookings", host, restaurant_id)))
                    .query(&[
                        ("status", status),
                        ("from_date", from.map(|d| d.to_string())),
                        ("to_date", to.map(|d| d.to_string())),
                    ])
                    .send()
                    .await?;
                if let Some(body) = report(res, &mut session).await? {
                    let bookings = body.as_array().cloned().unwrap_or_default();
                    if bookings.is_empty() {
                        println!("No bookings found for this restaurant.");
                    }
                    for b in bookings {
                        println!(
                            "#{} {} on {} for {} guests, {}",
                            b["id"],
                            b["booking_username"].as_str().unwrap_or("?"),
                            b["booking_date"].as_str().unwrap_or("?"),
                            b["number_of_guests"],
                            b["status"].as_str().unwrap_or("?")
                        );
                    }
                }
            }
            BookingCmds::Mine => {
                let res = session.attach(client.get(format!("{}/v1/bookings/mine", host))).send().await?;
                if let Some(body) = report(res, &mut session).await? {
                    println!("{}", serde_json::to_string_pretty(&body)?);
                }
            }
            BookingCmds::Confirm { id } => {
                let res = session.attach(client.put(format!("{}/v1/booking/{}/confirm", host, id))).send().await?;
                if report(res, &mut session).await?.is_some() {
                    println!("Booking {} confirmed successfully", id);
                }
            }
            BookingCmds::Reject { id } => {
                let res = session.attach(client.put(format!("{}/v1/booking/{}/reject", host, id))).send().await?;
                if report(res, &mut session).await?.is_some() {
                    println!("Booking {} rejected successfully", id);
                }
            }
        },
        Commands::Review(review) => match review.command {
            ReviewCmds::List { restaurant_id } => {
                let res = client.get(format!("{}/v1/restaurant/{}/reviews", host, restaurant_id)).send().await?;
                if let Some(body) = report(res, &mut session).await? {
                    for r in body.as_array().into_iter().flatten() {
                        println!("#{} {} ({}/5): {}", r["id"], r["username"].as_str().unwrap_or("?"), r["rating"], r["comment"].as_str().unwrap_or(""));
                        if let Some(reply) = r["reply"].as_str() {
                            println!("    owner: {}", reply);
                        }
                    }
                }
            }
            ReviewCmds::Add { restaurant_id, username, rating, comment } => {
                let res = client
                    .post(format!("{}/v1/restaurant/{}/reviews", host, restaurant_id))
                    .json(&serde_json::json!({ "username": username, "rating": rating, "comment": comment }))
                    .send()
                    .await?;
                if report(res, &mut session).await?.is_some() {
                    println!("Thanks for your review");
                }
            }
            ReviewCmds::Reply { review_id, text } => {
                let res = session
                    .attach(client.post(format!("{}/v1/review/{}/reply", host, review_id)))
                    .json(&serde_json::json!({ "reply": text }))
                    .send()
                    .await?;
                if report(res, &mut session).await?.is_some() {
                    println!("Reply posted");
                }
            }
        },
    };
    Ok(())
}
