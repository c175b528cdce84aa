// Caesar cipher: shift every letter of a message by a number of steps.
// Edit anything below and watch the highlighting follow along.

use std::collections::HashMap;

const ALPHABET: &str = "abcdefghijklmnopqrstuvwxyz";

/// Rotate an alphabet, e.g. "abc..z" by 1 gives "bcd..za"
fn rotation(alphabet: &str, steps: usize) -> String {
    let steps = steps % alphabet.len();
    format!("{}{}", &alphabet[steps..], &alphabet[..steps])
}

/// Map each letter of `keys` to the letter at the same place in `values`
fn map_maker(keys: &str, values: &str) -> HashMap<char, char> {
    assert_eq!(keys.len(), values.len(), "uneven lengths");
    let mut chart: HashMap<char, char> = keys.chars().zip(values.chars()).collect();
    chart.insert(' ', ' ');
    chart
}

fn encoder(steps: usize) -> HashMap<char, char> {
    map_maker(ALPHABET, &rotation(ALPHABET, steps))
}

fn decoder(steps: usize) -> HashMap<char, char> {
    map_maker(&rotation(ALPHABET, steps), ALPHABET)
}

fn operate(message: &str, shift_map: &HashMap<char, char>) -> String {
    message
        .chars()
        .map(|c| *shift_map.get(&c).unwrap_or(&c))
        .collect()
}

fn main() {
    let message = "the quick brown fox".to_lowercase();
    let steps = 3;

    let shifted = operate(&message, &encoder(steps));
    let restored = operate(&shifted, &decoder(steps));

    println!("{shifted}");
    assert_eq!(restored, message);
}
