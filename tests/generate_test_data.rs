// Synthetic dataset generator for LifeLink Algo
//
// Writes donors.csv / hospitals.csv / recipients.csv into data/ so the
// service has something to serve in development.
//
// Run: cargo test --test generate_test_data -- --ignored

use rand::seq::SliceRandom;
use rand::Rng;
use std::fs::{create_dir_all, File};
use std::io::{BufWriter, Write};

const BLOOD_TYPES: &[&str] = &["O-", "O+", "A-", "A+", "B-", "B+", "AB-", "AB+"];
const PHONE_PREFIX: &str = "+91";

// Odisha cities with approximate coordinates
const CITIES: &[(&str, f64, f64)] = &[
    ("Bhubaneswar", 20.2961, 85.8245),
    ("Cuttack", 20.4625, 85.8828),
    ("Rourkela", 22.2604, 84.8536),
    ("Berhampur", 19.3140, 84.7941),
    ("Sambalpur", 21.4669, 83.9757),
    ("Puri", 19.8134, 85.8315),
    ("Balasore", 21.4940, 86.9427),
    ("Angul", 20.8442, 85.1511),
    ("Dhenkanal", 20.6587, 85.5980),
    ("Khordha", 20.1883, 85.6214),
];

fn random_city(rng: &mut impl Rng) -> (f64, f64) {
    let (_, lat, lon) = CITIES.choose(rng).copied().unwrap();
    (
        lat + rng.gen_range(-0.05..0.05),
        lon + rng.gen_range(-0.05..0.05),
    )
}

fn random_phone(rng: &mut impl Rng) -> String {
    let digits: String = (0..10).map(|_| rng.gen_range(0..10).to_string()).collect();
    format!("{}{}", PHONE_PREFIX, digits)
}

fn random_date(rng: &mut impl Rng) -> String {
    format!(
        "{}-{:02}-{:02}",
        rng.gen_range(2023..=2025),
        rng.gen_range(1..=12),
        rng.gen_range(1..=28)
    )
}

#[test]
#[ignore = "writes CSV files into data/, run on demand"]
fn generate_test_data() {
    let mut rng = rand::thread_rng();
    create_dir_all("data").unwrap();

    let mut donors = BufWriter::new(File::create("data/donors.csv").unwrap());
    writeln!(donors, "id,blood_type,latitude,longitude,last_donation,phone").unwrap();
    for id in 1..=100u32 {
        let (lat, lon) = random_city(&mut rng);
        writeln!(
            donors,
            "{},{},{:.4},{:.4},{},{}",
            id,
            BLOOD_TYPES.choose(&mut rng).unwrap(),
            lat,
            lon,
            random_date(&mut rng),
            random_phone(&mut rng)
        )
        .unwrap();
    }

    let mut hospitals = BufWriter::new(File::create("data/hospitals.csv").unwrap());
    writeln!(hospitals, "id,name,latitude,longitude,blood_type,stock").unwrap();
    for id in 1..=20u32 {
        let (name, base_lat, base_lon) = CITIES.choose(&mut rng).copied().unwrap();
        writeln!(
            hospitals,
            "{},{} Hospital,{:.4},{:.4},{},{}",
            id,
            name,
            base_lat + rng.gen_range(-0.05..0.05),
            base_lon + rng.gen_range(-0.05..0.05),
            BLOOD_TYPES.choose(&mut rng).unwrap(),
            rng.gen_range(0..=10)
        )
        .unwrap();
    }

    let mut recipients = BufWriter::new(File::create("data/recipients.csv").unwrap());
    writeln!(recipients, "id,blood_type,latitude,longitude,urgency").unwrap();
    for id in 1..=50u32 {
        let (lat, lon) = random_city(&mut rng);
        writeln!(
            recipients,
            "{},{},{:.4},{:.4},{}",
            id,
            BLOOD_TYPES.choose(&mut rng).unwrap(),
            lat,
            lon,
            rng.gen_range(1..=10)
        )
        .unwrap();
    }
}
