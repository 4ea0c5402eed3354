// Feature layouts:
// UniDic: pos1,pos2,pos3,pos4,cType,cForm,lForm,lemma,orth,pron,orthBase,pronBase,goshu,
//         iType,iForm,fType,fForm,iConType,fConType,type,kana,kanaBase,...
// IPADIC: pos1,pos2,pos3,pos4,cType,cForm,baseForm,reading,pronunciation

use crate::{
    core::{
        PartOfSpeech,
        Token,
    },
    dictionary::DictType,
};

const UNSET: &str = "*";

pub struct VibratoToken {
    pub surface: String,
    pub features: String,
}

impl From<vibrato::token::Token<'_, '_>> for VibratoToken {
    fn from(value: vibrato::token::Token) -> Self {
        Self {
            surface: value.surface().into(),
            features: value.feature().into(),
        }
    }
}

impl VibratoToken {
    pub fn into_token(self, dict_type: &DictType) -> Token {
        let fields: Vec<&str> = self.features.split(',').collect();
        let get_field = |idx: usize| fields.get(idx).copied().filter(|f| !f.is_empty() && *f != UNSET);

        let part_of_speech = get_field(0).map(PartOfSpeech::from).unwrap_or(PartOfSpeech::Other);
        let reading = dict_type.reading_indices().iter().find_map(|&idx| get_field(idx));

        Token::new(&self.surface, reading, part_of_speech)
    }
}
