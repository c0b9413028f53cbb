//! Command-line demo for the Diffbot client.
//!
//! Fetches a page through the Diffbot API and prints the extracted text,
//! the title, and every first-level field of the response.
//!
//! Run with: `DIFFBOT_TOKEN=your-token cargo run --example demo -- <url> [<method>]`

use diffbot::Diffbot;

fn main() -> Result<(), diffbot::Error> {
    let mut args = std::env::args().skip(1);
    let url = match args.next() {
        Some(url) => url,
        None => {
            eprintln!("usage: demo <url> [<method>]");
            std::process::exit(2);
        }
    };
    let method = args.next();

    let token = std::env::var("DIFFBOT_TOKEN").expect("DIFFBOT_TOKEN must be set");

    // Prepare the request.
    let mut client = Diffbot::new(token)?;
    client.set_timeout(20)?;
    if let Some(method) = method {
        client.set_method(method);
    }

    // Send it; the raw body is retained on the client.
    client.api_request(&url)?;
    let result = client.parse_response()?;

    // A single field, projected to a string.
    println!("TEXT:");
    println!("{}", result.field("text"));

    // Nested data goes through the underlying JSON document.
    let title = result
        .json()
        .get("title")
        .and_then(|t| t.as_str())
        .unwrap_or("<no title>");
    println!("JSON title: {title}");

    // Every first-level field; arrays and objects show as placeholders.
    println!("ALL FIELDS:");
    for (name, value) in result.all_fields() {
        println!("{name}={value:?}");
    }

    Ok(())
}
