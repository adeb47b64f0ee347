//! Accumulate two contents, then prove one member and one absent content.
//!
//! An optional JSON config path may be passed as the first argument, e.g.
//! `{ "modulus_bits": 1024 }`.

use std::{env, error::Error, fs, sync::Arc};

use log::info;
use rand::rngs::OsRng;

use rsa_accum::{trusted_setup, verify_membership, verify_non_membership, Accumulator, Config};

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let config: Config = match env::args().nth(1) {
        Some(path) => serde_json::from_str(&fs::read_to_string(path)?)?,
        None => Config::default(),
    };
    info!("using {:?}", config);

    let params = Arc::new(trusted_setup(config.modulus_bits, OsRng)?);
    let mut accum = Accumulator::with_config(params.clone(), &config);
    accum.add(b"Hello!")?;
    accum.add(b"Test!")?;

    let digest = accum.digest();
    println!("digest: {digest}");

    let proof = accum.prove_membership(b"Hello!")?;
    if verify_membership(params.modulus(), b"Hello!", digest, &proof)? {
        println!("'Hello!' is in the set.");
    } else {
        println!("The proof is wrong.");
    }

    let proof = accum.prove_non_membership(b"QAQ")?;
    if verify_non_membership(params.modulus(), b"QAQ", digest, &proof, params.generator())? {
        println!("'QAQ' is not in the set.");
    } else {
        println!("The proof is wrong.");
    }
    Ok(())
}
