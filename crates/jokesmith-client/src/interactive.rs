use std::io::{self, Write};

use eyre::Result;
use jokesmith_core::models::catalog::{TONES, TOPICS, TYPES};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::driver::Driver;
use crate::form::{Field, ParameterForm};
use crate::render;

const HELP: &str = "\
Commands:
  topic <value>   tone <value>   type <value>   temp <0..1>
  generate (g)    evaluate (e)   history (h)    transcript (t)
  help            quit";

pub async fn run(driver: &mut Driver, mut form: ParameterForm) -> Result<()> {
    println!("{}", render::choices("Topics", TOPICS));
    println!("{}", render::choices("Tones", TONES));
    println!("{}", render::choices("Types", TYPES));
    println!("{HELP}");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("{}", render::prompt(driver.session(), form.is_complete()));
        io::stdout().flush()?;
        let Some(line) = lines.next_line().await? else {
            println!("Good Bye!");
            break;
        };
        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        let (command, arg) = input.split_once(' ').unwrap_or((input, ""));

        match command {
            "quit" | "exit" | "q" => {
                println!("Good Bye!");
                break;
            }
            "help" | "?" => println!("{HELP}"),
            "topic" => form.set(Field::Topic, arg),
            "tone" => form.set(Field::Tone, arg),
            "type" => form.set(Field::Type, arg),
            "temp" | "temperature" => match arg.trim().parse::<f32>() {
                Ok(t) if (0.0..=1.0).contains(&t) => form.temperature = t,
                _ => eprintln!("error: temperature must be a number between 0 and 1"),
            },
            "generate" | "g" => generate(driver, &form).await?,
            "evaluate" | "e" => evaluate(driver).await?,
            "history" | "h" => println!("{}", render::summary(&driver.session().history().summary())),
            "transcript" | "t" => println!("{}", render::transcript(driver.session().messages())),
            other => eprintln!("error: unknown command {other:?} (try help)"),
        }
    }
    Ok(())
}

pub async fn generate(driver: &mut Driver, form: &ParameterForm) -> Result<()> {
    let params = match form.to_parameters() {
        Ok(params) => params,
        Err(e) => {
            eprintln!("error: {}", render::parameter_error(&e));
            return Ok(());
        }
    };

    print!("AI: ");
    io::stdout().flush()?;
    let outcome = driver
        .generate(params, |chunk| {
            print!("{chunk}");
            let _ = io::stdout().flush();
        })
        .await;
    println!();

    match outcome {
        Err(e) => eprintln!("error: {e}"),
        Ok(()) => {
            if let Some(failure) = driver.session().last_failure() {
                eprintln!("error: {failure}");
            }
        }
    }
    Ok(())
}

pub async fn evaluate(driver: &mut Driver) -> Result<()> {
    if let Err(e) = driver.evaluate().await {
        eprintln!("error: {e}");
        return Ok(());
    }
    match (driver.session().evaluation(), driver.session().last_failure()) {
        (_, Some(failure)) => eprintln!("error: {failure}"),
        (Some(result), None) => println!("{}", render::evaluation(result)),
        (None, None) => {}
    }
    Ok(())
}
