use crate::template::Templates;

pub const UNKNOWN: &str = "I don't understand!";
pub const TRAINING_STARTED: &str = "Starting self-training...";
pub const TRAINING_DONE: &str = "Self-training complete!";
pub const NO_BIRTHDAY: &str =
    "The streamer is not born yet! [To set the streamer's birth date, just ask me to do so ;)]";
pub const BAD_BIRTHDAY: &str = "Sorry, I didn't understand the date. Please try again.";
pub const NO_CREATION_DATE: &str =
    "I honestly can't remember when I was activated. [Set BOT_CREATION to a YYYY-MM-DD date]";
pub const NO_WEATHER: &str = "Sorry, I can't check the weather right now.";

lazy_static::lazy_static! {
    pub static ref TIME: Templates = Templates::parse(&[
        "The time is {time}.",
        "It's currently {time}.",
        "The current time is {time}.",
        "It's approximately {time}.",
        "Let me check... the time now is {time}.",
        "I have the time, it's {time}.",
    ]).expect("Static template");

    pub static ref WEATHER: Templates = Templates::parse(&[
        "Let me check! At the streamer's location, the current temperature is {temperature}, with {weather_description}.",
        "It looks like {weather_description} today, with temperatures around {temperature}.",
        "According to the latest forecast, it will be {weather_description} today, with temperatures in the range of {temperature}.",
        "It's {temperature} degrees outside right now, with {weather_description}.",
        "Based on the latest information, the temperature today will be {temperature}, with {weather_description}.",
        "It's currently {temperature} degrees and {weather_description}.",
        "I'm seeing a forecast of {weather_description} for the streamer's location today, with temperatures around {temperature}.",
        "The temperature in the streamer's location today is expected to range from {temperature_min} to {temperature_max}, with {weather_description}.",
        "According to the latest weather reports, it will be {weather_description} and {temperature} degrees at the streamer's location today.",
        "The forecast for this week predicts {weather_description} with temperatures ranging from {temperature_min} to {temperature_max}.",
    ]).expect("Static template");

    pub static ref BOT_AGE: Templates = Templates::parse(&[
        "I was activated on {created}, so you could say that I am about {age} old!",
        "My programming first began in {created}, so I'm still a relatively young bot at around {age} old!",
        "I was created in {created}, so that makes me only around {age} old!",
        "I'm technically ageless, but if you're asking when my programming began, that would be in {created}. So, I'm around {age} old.",
        "Age doesn't really apply to a bot like me. But my programming was started in {created}, so I've been around for around {age}.",
        "I was first activated in {created}, so if you had to put a number on it, I'd be about {age} old!",
        "My programming started in {created}, so you could say that I'm relatively new to the chatbot scene at around {age} old.",
    ]).expect("Static template");

    pub static ref STREAMER_AGE: Templates = Templates::parse(&[
        "The streamer is currently {age} years old.",
        "According to public records, the streamer was born in {year}, making them {age} years old.",
        "The streamer's birth year is {year}, so they must be {age} years old.",
        "Well, technically speaking, the streamer was born on {birthday}, so they are {age} years old.",
        "I think the streamer is {age} years old!",
        "As far as I know, the streamer is {age} years young and going strong!",
    ]).expect("Static template");

    pub static ref BIRTHDAY_SET: Templates = Templates::parse(&[
        "Sure, the streamer's birth date has been set to {birthday}.",
        "Noted, the streamer's birth date is now {birthday}.",
        "Done, the streamer's birth date has been updated to {birthday}.",
        "Great, the streamer was born on {birthday}.",
    ]).expect("Static template");
}
