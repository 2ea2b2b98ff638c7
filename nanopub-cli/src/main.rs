use std::{
    fs,
    path::{Path, PathBuf},
    process::ExitCode,
};

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use nanopub::{
    profile::{PROFILE_DIR, PROFILE_FILE},
    signer::DEFAULT_KEY_BITS,
    Nanopub, Profile, RdfFormat, RsaSigner, Signer,
};

/// Sign, publish and check nanopublications
#[derive(Debug, Parser)]
#[command(name = "np", version, about = "Nanopublication CLI")]
struct Cli {
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Debug, Subcommand)]
enum Cmd {
    /// Sign a nanopublication, writing signed.<FILE> next to it
    Sign {
        file: PathBuf,
        /// Private key to sign with instead of the profile's key
        #[arg(short, long)]
        key: Option<PathBuf>,
        /// Profile to read the key from
        #[arg(short, long)]
        profile: Option<PathBuf>,
    },
    /// Publish a nanopublication, signing it first if needed
    #[cfg(feature = "http")]
    Publish {
        file: PathBuf,
        /// Publish to the test server
        #[arg(short, long)]
        test: bool,
        #[arg(short, long)]
        key: Option<PathBuf>,
        #[arg(short, long)]
        profile: Option<PathBuf>,
    },
    /// Verify the signature and trusty URI of a signed nanopublication
    Check { file: PathBuf },
    /// Generate a key pair and write a profile
    Setup {
        #[arg(long)]
        orcid_id: String,
        #[arg(long)]
        name: String,
        /// Where to write id_rsa and id_rsa.pub, defaults to ~/.nanopub
        #[arg(long)]
        keys_dir: Option<PathBuf>,
        /// Where to write the profile, defaults to ~/.nanopub/profile.yml
        #[arg(long)]
        profile: Option<PathBuf>,
        #[arg(long, default_value_t = DEFAULT_KEY_BITS)]
        bits: usize,
    },
    /// Print the version
    Version,
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();
    match run(cli.cmd) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::from(1)
        }
    }
}

fn run(cmd: Cmd) -> Result<()> {
    match cmd {
        Cmd::Sign { file, key, profile } => {
            let (signed, path) = sign_file(&file, key.as_deref(), profile.as_deref())?;
            println!("Signed {} as {}", path.display(), signed.uri());
        }
        #[cfg(feature = "http")]
        Cmd::Publish {
            file,
            test,
            key,
            profile,
        } => {
            let nanopub = read_nanopub(&file)?;
            let nanopub = if nanopub.is_signed() {
                nanopub
            } else {
                let signer = load_signer(key.as_deref(), profile.as_deref())?;
                nanopub.sign(&signer)?
            };
            let client = nanopub::NanopubClient::new(test)?;
            let uri = client
                .publish(&nanopub)
                .with_context(|| format!("failed to publish to {}", client.server()))?;
            println!("Published {uri}");
        }
        Cmd::Check { file } => {
            let verified = check_file(&file)?;
            println!("Nanopublication {} is valid", verified.uri);
        }
        Cmd::Setup {
            orcid_id,
            name,
            keys_dir,
            profile,
            bits,
        } => {
            let path = setup(&orcid_id, &name, keys_dir, profile, bits)?;
            println!("Wrote profile to {}", path.display());
        }
        Cmd::Version => println!("np {}", env!("CARGO_PKG_VERSION")),
    }
    Ok(())
}

fn format_of(path: &Path) -> RdfFormat {
    RdfFormat::from_path(path).unwrap_or_default()
}

fn read_nanopub(path: &Path) -> Result<Nanopub> {
    let text =
        fs::read_to_string(path).with_context(|| format!("cannot read {}", path.display()))?;
    Nanopub::parse(&text, format_of(path))
        .with_context(|| format!("{} is not a nanopublication", path.display()))
}

fn load_signer(key: Option<&Path>, profile: Option<&Path>) -> Result<RsaSigner> {
    if let Some(key) = key {
        return RsaSigner::from_files(key, None)
            .with_context(|| format!("cannot load key {}", key.display()));
    }
    let profile = match profile {
        Some(path) => Profile::load(path)?,
        None => Profile::load_default()?,
    };
    log::debug!("signing as {}", profile.orcid_id);
    Ok(profile.signer()?)
}

/// `dir/FILE` becomes `dir/signed.FILE`.
fn signed_path(path: &Path) -> Result<PathBuf> {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| anyhow!("{} has no file name", path.display()))?;
    Ok(path.with_file_name(format!("signed.{name}")))
}

fn sign_file(
    file: &Path,
    key: Option<&Path>,
    profile: Option<&Path>,
) -> Result<(Nanopub, PathBuf)> {
    let nanopub = read_nanopub(file)?;
    let signer = load_signer(key, profile)?;
    let signed = nanopub.sign(&signer)?;

    let out = signed_path(file)?;
    fs::write(&out, signed.serialize(format_of(file)))
        .with_context(|| format!("cannot write {}", out.display()))?;
    Ok((signed, out))
}

fn check_file(file: &Path) -> Result<nanopub::Verified> {
    let nanopub = read_nanopub(file)?;
    Ok(nanopub.verify()?)
}

fn setup(
    orcid_id: &str,
    name: &str,
    keys_dir: Option<PathBuf>,
    profile: Option<PathBuf>,
    bits: usize,
) -> Result<PathBuf> {
    let profile_path = match profile {
        Some(path) => path,
        None => Profile::default_path()?,
    };
    let keys_dir = match keys_dir {
        Some(dir) => dir,
        None => Profile::default_path()?
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(PROFILE_DIR)),
    };

    let signer = RsaSigner::generate(bits)?;
    let (private_key, public_key) = signer.save(&keys_dir)?;
    log::info!("generated key {}", signer.public_key_b64()?);

    let profile = Profile {
        orcid_id: orcid_id.to_owned(),
        name: name.to_owned(),
        public_key,
        private_key,
        introduction_nanopub_uri: None,
    };
    profile.save(&profile_path)?;
    Ok(profile_path)
}
