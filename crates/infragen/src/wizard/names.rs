//! Default application and project names

use rand::Rng;

const ADJECTIVES: &[&str] = &[
    "amber", "brisk", "calm", "daring", "elastic", "frosty", "gentle", "hardy", "ionic", "jolly",
    "kinetic", "lucid", "modest", "noble", "orbital", "polar", "quiet", "rapid", "steady",
    "tidal",
];

const NOUNS: &[&str] = &[
    "anchor", "bastion", "cluster", "dynamo", "engine", "forge", "gateway", "hangar", "island",
    "jetty", "kernel", "lantern", "monolith", "node", "outpost", "pylon", "quarry", "rampart",
    "silo", "turbine",
];

/// Generate a default name like "steady-forge-2847"
pub fn generate() -> String {
    let mut rng = rand::thread_rng();
    let adjective = ADJECTIVES[rng.gen_range(0..ADJECTIVES.len())];
    let noun = NOUNS[rng.gen_range(0..NOUNS.len())];
    let number: u16 = rng.gen_range(1000..10000);
    format!("{}-{}-{}", adjective, noun, number)
}
