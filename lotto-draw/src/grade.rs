use lotto_core::{Draw, NumberSet, Ticket, Tier};

/// Prize tier of `ticket` against the winning `draw` numbers.
///
/// | matches | bonus in ticket | tier |
/// |---------|-----------------|------|
/// | 6       | -               | 1    |
/// | 5       | yes             | 2    |
/// | 5       | no              | 3    |
/// | 4       | -               | 4    |
/// | 3       | -               | 5    |
/// | <= 2    | -               | 0    |
///
/// A missing bonus never matches, so five matches without one is tier 3.
pub fn grade(ticket: &NumberSet, draw: &NumberSet, bonus: Option<u8>) -> Tier {
    match ticket.matches(draw) {
        6 => Tier::First,
        5 if bonus.is_some_and(|b| ticket.contains(b)) => Tier::Second,
        5 => Tier::Third,
        4 => Tier::Fourth,
        3 => Tier::Fifth,
        _ => Tier::NoWin,
    }
}

pub fn grade_ticket(ticket: &Ticket, draw: &Draw) -> Tier {
    grade(&ticket.numbers, &draw.numbers, draw.bonus)
}
