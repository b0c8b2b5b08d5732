use std::collections::BTreeSet;
use std::sync::OnceLock;

// The three "plain" character classes. A character outside all of them is a
// kanji candidate and goes through the grade lookup.

const HIRAGANA: &str = "ぁあぃいぅうぇえぉおかがきぎくぐけげこごさざしじすず\
                        せぜそぞただちぢっつづてでとどなにぬねのはばぱひびぴ\
                        ふぶぷへべぺほぼぽまみむめもゃやゅゆょよらりるれろわ\
                        をんーゎゐゑゕゖゔ";

const KATAKANA: &str = "ァアィイゥウェエォオカガキギクグケゲコゴサザシジスズ\
                        セゼソゾタダチヂッツヅテデトドナニヌネノハバパヒビピ\
                        フブプヘベペホボポマミムメモャヤュユョヨラリルレロワ\
                        ヲンーヮヰヱ";

// ASCII plus the fullwidth digits and Japanese punctuation that show up in the
// corpus text.
const PUNCT_AND_ASCII: &str = "ゝゞ・「」。、!！\"#$%&'()*+,-./:;<=>?@\
                               ABCDEFGHIJKLMNOPQRSTUVWXYZ\
                               0123456789０１２３４５６７８９\
                               [\\]^_`abcdefghijklmnopqrstuvwxyz{|}~ ";

fn plain_set() -> &'static BTreeSet<char> {
    static SET: OnceLock<BTreeSet<char>> = OnceLock::new();
    SET.get_or_init(|| {
        HIRAGANA
            .chars()
            .chain(KATAKANA.chars())
            .chain(PUNCT_AND_ASCII.chars())
            .collect()
    })
}

/// True for phonetic/punctuation/ASCII characters; false for anything else,
/// which is then treated as a kanji candidate. Total over all Unicode input.
pub fn is_plain(c: char) -> bool {
    plain_set().contains(&c)
}
