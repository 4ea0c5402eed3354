use std::{
    fs::{
        self,
        File,
    },
    io::{
        self,
        BufReader,
        BufWriter,
    },
    path::{
        Path,
        PathBuf,
    },
};

use liblzma::read::XzDecoder;
use serde::{
    Deserialize,
    Serialize,
};
use tar::Archive;
use vibrato::Dictionary;
use zstd::stream::copy_decode;

use crate::{
    core::{
        http::{
            download_to_file,
            http_client,
        },
        UtsushiError,
    },
    persistence::get_app_data_dir,
};

fn get_tokenizer_dict_dir() -> PathBuf {
    get_app_data_dir().join("dictionaries").join("tokenizer")
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DictType {
    #[default]
    Unidic,
    Ipadic,
}

impl DictType {
    fn url(&self) -> &str {
        match self {
            DictType::Unidic => {
                "https://github.com/daac-tools/vibrato/releases/download/v0.5.0/bccwj-suw+unidic-cwj-3_1_1.tar.xz"
            }
            DictType::Ipadic => {
                "https://github.com/daac-tools/vibrato/releases/download/v0.5.0/ipadic-mecab-2_7_0.tar.xz"
            }
        }
    }

    fn folder_name(&self) -> &str {
        match self {
            DictType::Unidic => "bccwj-suw+unidic-cwj-3_1_1",
            DictType::Ipadic => "ipadic-mecab-2_7_0",
        }
    }

    // Feature columns holding the kana reading, most preferred first
    pub fn reading_indices(&self) -> &'static [usize] {
        match self {
            DictType::Unidic => &[20, 9], // kana, pron
            DictType::Ipadic => &[7, 8],  // reading, pronunciation
        }
    }
}

fn cleanup_files(folder_path: &Path, keep_files: &[&str]) -> Result<(), UtsushiError> {
    let keep_paths: Vec<PathBuf> = keep_files.iter().map(|f| folder_path.join(f)).collect();

    for entry in fs::read_dir(folder_path).map_err(|e| {
        UtsushiError::Custom(format!("Failed to read directory during cleanup: {}", e))
    })? {
        let path = entry?.path();

        if keep_paths.contains(&path) {
            continue;
        }

        if path.is_dir() {
            fs::remove_dir_all(&path)?;
        } else {
            fs::remove_file(&path)?;
        }
    }

    tracing::debug!(?keep_files, "Dictionary cleanup complete");
    Ok(())
}

/// Returns the path of an unpacked `system.dic`, downloading it on first use.
pub fn ensure_dictionary(dict_type: &DictType) -> Result<PathBuf, UtsushiError> {
    let url = dict_type.url();
    let folder_name = dict_type.folder_name();
    let dict_dir = get_tokenizer_dict_dir();
    let extract_path = dict_dir.join(folder_name);
    let final_dic_path = extract_path.join("system.dic");

    if final_dic_path.exists() {
        tracing::info!(path = %final_dic_path.display(), "Tokenizer dictionary present");
        return Ok(final_dic_path);
    }

    fs::create_dir_all(&dict_dir).map_err(|e| {
        UtsushiError::Custom(format!("Failed to create dictionary directory {:?}: {}", dict_dir, e))
    })?;

    // Leftovers from an interrupted attempt
    let download_path = dict_dir.join(format!("{}.tar.xz", folder_name));
    let tar_path = dict_dir.join(format!("{}.tar", folder_name));
    fs::remove_file(&download_path).ok();
    fs::remove_file(&tar_path).ok();
    fs::remove_dir_all(&extract_path).ok();

    tracing::info!(url, "Downloading tokenizer dictionary");
    let client = http_client()?;
    download_to_file(&client, url, &download_path)?;

    if download_path.metadata()?.len() == 0 {
        return Err(UtsushiError::Custom(format!(
            "Downloaded file {:?} is empty. Check your internet connection.",
            download_path
        )));
    }

    tracing::info!("Extracting tokenizer dictionary");
    let tar_xz_file = File::open(&download_path)?;
    let mut tar_file = File::create(&tar_path)?;
    let mut xz_decoder = XzDecoder::new(BufReader::new(tar_xz_file));
    io::copy(&mut xz_decoder, &mut tar_file).map_err(|e| {
        UtsushiError::Custom(format!(
            "Failed to decompress XZ to TAR: {}. Possible corrupt download.",
            e
        ))
    })?;

    let mut archive = Archive::new(BufReader::new(File::open(&tar_path)?));
    archive.unpack(&extract_path).map_err(|e| {
        UtsushiError::Custom(format!("Failed to unpack TAR to {:?}: {}.", extract_path, e))
    })?;

    let zst_path = extract_path.join(folder_name).join("system.dic.zst");
    if !zst_path.exists() {
        return Err(UtsushiError::Custom(format!(
            "ZST file not found at {:?} after extraction.",
            zst_path
        )));
    }

    let zst_file = File::open(&zst_path)?;
    let dic_file = File::create(&final_dic_path)?;
    copy_decode(BufReader::new(zst_file), BufWriter::new(dic_file)).map_err(|e| {
        UtsushiError::Custom(format!("Failed to decompress ZST to {:?}: {}.", final_dic_path, e))
    })?;

    cleanup_files(&extract_path, &["system.dic"])?;
    fs::remove_file(&download_path)?;
    fs::remove_file(&tar_path)?;

    tracing::info!(path = %final_dic_path.display(), "Tokenizer dictionary ready");
    Ok(final_dic_path)
}

/// Reads a compiled dictionary, decompressing on the fly for `.zst` files.
pub fn load_dictionary(path: &Path) -> Result<Dictionary, UtsushiError> {
    let reader = BufReader::new(File::open(path)?);
    let dict = if path.extension().is_some_and(|ext| ext == "zst") {
        Dictionary::read(zstd::Decoder::new(reader)?)?
    } else {
        Dictionary::read(reader)?
    };
    Ok(dict)
}
