use crate::error::ClockError;
use crate::hardware::SpeechSink;

/// Spoken form of a 24-hour time, spelled for the speech synthesizer.
///
/// `(0, 0)` reads "12 Oh Clock Aaa M", `(13, 5)` reads "1 , Oh 5 P M".
pub fn format_time(hour: u32, minute: u32) -> String {
    let hour = hour % 24;
    let pm = hour >= 12;
    let hour = match hour % 12 {
        0 => 12,
        h => h,
    };
    let pm_string = if pm { "P M" } else { "Aaa M" };

    if minute == 0 {
        return format!("{} Oh Clock {}", hour, pm_string);
    }
    let minute_string = if minute >= 10 {
        minute.to_string()
    } else {
        format!("Oh {}", minute)
    };
    format!("{} , {} {}", hour, minute_string, pm_string)
}

/// Speak the time and wait for the announcement to finish.
pub fn say_time<S: SpeechSink>(speech: &mut S, hour: u32, minute: u32) -> Result<(), ClockError> {
    speech.speak_blocking(&format_time(hour, minute))
}
