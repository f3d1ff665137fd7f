//! Greeting messages from randomly chosen templates
//!
//! The random source is always passed in by the caller, so tests can use a
//! seeded generator and get a fixed template sequence.

use crate::GreetingError;
use rand::Rng;
use std::collections::HashMap;

/// Templates a greeting is drawn from; `{name}` is replaced by the name
pub const TEMPLATES: [&str; 3] = [
    "Hi, {name}. Welcome!",
    "Great to see you, {name}!",
    "Hail, {name}. Well met!",
];

/// Returns a greeting for `name` using a template picked by `rng`
///
/// # Example
///
/// ```
/// use rand::rngs::StdRng;
/// use rand::SeedableRng;
/// use ripple_crawl::greetings::greet;
///
/// let mut rng = StdRng::seed_from_u64(1);
/// let message = greet("Gladys", &mut rng).unwrap();
/// assert!(message.contains("Gladys"));
/// ```
pub fn greet<R: Rng + ?Sized>(name: &str, rng: &mut R) -> Result<String, GreetingError> {
    if name.is_empty() {
        return Err(GreetingError::EmptyName);
    }

    let template = TEMPLATES[rng.random_range(0..TEMPLATES.len())];
    Ok(template.replace("{name}", name))
}

/// Greets every name, keyed by name
///
/// Fails on the first empty name without returning partial results.
pub fn hellos<R, S>(names: &[S], rng: &mut R) -> Result<HashMap<String, String>, GreetingError>
where
    R: Rng + ?Sized,
    S: AsRef<str>,
{
    let mut messages = HashMap::with_capacity(names.len());
    for name in names {
        let name = name.as_ref();
        messages.insert(name.to_string(), greet(name, rng)?);
    }
    Ok(messages)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(2024)
    }

    #[test]
    fn test_greet_contains_name() {
        let message = greet("Foo", &mut rng()).unwrap();
        assert!(message.contains("Foo"));
        assert!(TEMPLATES
            .iter()
            .any(|t| t.replace("{name}", "Foo") == message));
    }

    #[test]
    fn test_greet_empty_name() {
        assert_eq!(greet("", &mut rng()), Err(GreetingError::EmptyName));
    }

    #[test]
    fn test_same_seed_same_greeting() {
        let first: Vec<String> = (0..5).map(|_| greet("Ann", &mut rng()).unwrap()).collect();
        assert!(first.windows(2).all(|w| w[0] == w[1]));
    }

    #[test]
    fn test_every_template_is_reachable() {
        let mut rng = rng();
        let mut seen = std::collections::HashSet::new();
        for _ in 0..200 {
            seen.insert(greet("X", &mut rng).unwrap());
        }
        assert_eq!(seen.len(), TEMPLATES.len());
    }

    #[test]
    fn test_hellos() {
        let messages = hellos(&["Cristi", "Alice"], &mut rng()).unwrap();
        assert_eq!(messages.len(), 2);
        assert!(messages["Cristi"].contains("Cristi"));
        assert!(messages["Alice"].contains("Alice"));
    }

    #[test]
    fn test_hellos_fails_on_empty_name() {
        let names = vec!["Bob".to_string(), String::new()];
        assert_eq!(hellos(&names, &mut rng()), Err(GreetingError::EmptyName));
    }
}
