//! Built-in demo data for a fresh install.

use chrono::{DateTime, Duration, Utc};

use crate::models::{Category, Chat, Message, Product};

fn listing(
    id: &str,
    title: &str,
    description: &str,
    price: f64,
    category: Category,
    owner: &str,
    created_at: DateTime<Utc>,
) -> Product {
    Product::builder(id, title, price, owner)
        .description(description)
        .category(category)
        .image(format!(
            "/placeholder.svg?height=400&width=400&text={}",
            title.replace(' ', "+")
        ))
        .college_id("1")
        .created_at(created_at)
        .build()
}

/// Six listings, relative to `now`.
pub fn products(now: DateTime<Utc>) -> Vec<Product> {
    let days_ago = |d: i64| now - Duration::days(d);
    vec![
        listing(
            "1",
            "Casio Scientific Calculator",
            "Barely used Casio FX-991EX scientific calculator. Perfect for engineering and science courses.",
            800.0,
            Category::Electronics,
            "2",
            days_ago(2),
        ),
        listing(
            "2",
            "Data Structures and Algorithms Textbook",
            "Cormen's Introduction to Algorithms, 3rd Edition. Some highlighting and notes but in good condition.",
            450.0,
            Category::Books,
            "3",
            days_ago(5),
        ),
        listing(
            "3",
            "Desk Lamp with USB Charging Port",
            "Adjustable LED desk lamp with 3 brightness levels and USB charging port.",
            600.0,
            Category::Electronics,
            "4",
            days_ago(1),
        ),
        listing(
            "4",
            "Ergonomic Office Chair",
            "Comfortable office chair with lumbar support. Used for one semester.",
            1200.0,
            Category::Furniture,
            "5",
            days_ago(10),
        ),
        listing(
            "5",
            "Tennis Racket - Wilson Pro Staff",
            "Wilson Pro Staff tennis racket in excellent condition. Includes cover.",
            900.0,
            Category::Sports,
            "6",
            days_ago(3),
        ),
        listing(
            "6",
            "Graphic Calculator TI-84 Plus",
            "Texas Instruments TI-84 Plus graphic calculator. Required for calculus and statistics courses.",
            750.0,
            Category::Electronics,
            "7",
            days_ago(7),
        ),
    ]
}

/// One thread about the calculator, with three messages.
pub fn conversation(now: DateTime<Utc>) -> (Vec<Chat>, Vec<Message>) {
    let minutes_ago = |m: i64| now - Duration::minutes(m);
    let text = [
        ("msg1", "2", 60, "Hi, is the calculator still available?"),
        ("msg2", "1", 58, "Yes, it's still available! When would you like to meet?"),
        ("msg3", "2", 56, "Great! How about tomorrow at the library around 3pm?"),
    ];

    let messages: Vec<Message> = text
        .iter()
        .map(|(id, sender, ago, content)| Message {
            id: (*id).into(),
            thread_id: "chat1".into(),
            sender_id: (*sender).into(),
            content: (*content).to_owned(),
            timestamp: minutes_ago(*ago),
        })
        .collect();

    let last = messages.last();
    let chats = vec![Chat {
        id: "chat1".into(),
        participant_a: "1".into(),
        participant_b: "2".into(),
        last_message: last.map(|m| m.content.clone()),
        updated_at: last.map_or(now, |m| m.timestamp),
    }];

    (chats, messages)
}
