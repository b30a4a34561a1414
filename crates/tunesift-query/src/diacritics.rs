//! Raw diacritic data for pattern folding.
//!
//! Keys of [`COMBINING_BASES`] are sequences of combining marks; values are the base
//! letters that compose with the whole sequence into a single precomposed character.
//! [`COLLATION_VARIANTS`] lists characters that collate like a letter (or letter
//! sequence) without a canonical decomposition, such as `ß` for `ss` or `ø` for `o`.

/// Combining mark sequences and the base letters they compose with.
pub const COMBINING_BASES: &[(&str, &str)] = &[
    (
        "\u{300}",
        concat!(
            "AEINOUWYaeinouwy\u{391}\u{395}\u{397}\u{399}\u{39f}\u{3a5}\u{3a9}",
            "\u{3b1}\u{3b5}\u{3b7}\u{3b9}\u{3bf}\u{3c5}\u{3c9}\u{415}\u{418}\u{435}",
            "\u{438}",
        ),
    ),
    ("\u{300}\u{345}", "\u{3b1}\u{3b7}\u{3c9}"),
    (
        "\u{301}",
        concat!(
            "ACEGIKLMNOPRSUWYZacegiklmnoprsuwyz\u{c6}\u{d8}\u{e6}\u{f8}\u{391}",
            "\u{395}\u{397}\u{399}\u{39f}\u{3a5}\u{3a9}\u{3b1}\u{3b5}\u{3b7}\u{3b9}",
            "\u{3bf}\u{3c5}\u{3c9}\u{413}\u{41a}\u{433}\u{43a}",
        ),
    ),
    ("\u{301}\u{307}", "Ss"),
    ("\u{301}\u{345}", "\u{3b1}\u{3b7}\u{3c9}"),
    ("\u{302}", "ACEGHIJOSUWYZaceghijosuwyz"),
    ("\u{302}\u{300}", "AEOaeo"),
    ("\u{302}\u{301}", "AEOaeo"),
    ("\u{302}\u{303}", "AEOaeo"),
    ("\u{302}\u{309}", "AEOaeo"),
    ("\u{303}", "AEINOUVYaeinouvy"),
    ("\u{303}\u{301}", "OUou"),
    ("\u{303}\u{304}", "Oo"),
    ("\u{303}\u{308}", "Oo"),
    (
        "\u{304}",
        concat!(
            "AEGIOUYaegiouy\u{c6}\u{e6}\u{391}\u{399}\u{3a5}\u{3b1}\u{3b9}\u{3c5}",
            "\u{418}\u{423}\u{438}\u{443}",
        ),
    ),
    ("\u{304}\u{300}", "EOeo"),
    ("\u{304}\u{301}", "EOeo"),
    ("\u{304}\u{308}", "Uu"),
    (
        "\u{306}",
        concat!(
            "AEGIOUaegiou\u{391}\u{399}\u{3a5}\u{3b1}\u{3b9}\u{3c5}\u{410}\u{415}",
            "\u{416}\u{418}\u{423}\u{430}\u{435}\u{436}\u{438}\u{443}",
        ),
    ),
    ("\u{306}\u{300}", "Aa"),
    ("\u{306}\u{301}", "Aa"),
    ("\u{306}\u{303}", "Aa"),
    ("\u{306}\u{309}", "Aa"),
    ("\u{307}", "ABCDEFGHIMNOPRSTWXYZabcdefghmnoprstwxyz"),
    ("\u{307}\u{304}", "AOao"),
    (
        "\u{308}",
        concat!(
            "AEHIOUWXYaehiotuwxy\u{399}\u{3a5}\u{3b9}\u{3c5}\u{406}\u{410}\u{415}",
            "\u{416}\u{417}\u{418}\u{41e}\u{423}\u{427}\u{42b}\u{42d}\u{430}\u{435}",
            "\u{436}\u{437}\u{438}\u{43e}\u{443}\u{447}\u{44b}\u{44d}\u{456}\u{4d8}",
            "\u{4d9}\u{4e8}\u{4e9}",
        ),
    ),
    ("\u{308}\u{300}", "Uu\u{3b9}\u{3c5}"),
    ("\u{308}\u{301}", "IUiu\u{3b9}\u{3c5}"),
    ("\u{308}\u{304}", "AOUaou"),
    ("\u{308}\u{30c}", "Uu"),
    ("\u{308}\u{342}", "\u{3b9}\u{3c5}"),
    ("\u{309}", "AEIOUYaeiouy"),
    ("\u{30a}", "AUauwy"),
    ("\u{30a}\u{301}", "Aa"),
    ("\u{30b}", "OUou\u{423}\u{443}"),
    ("\u{30c}", "ACDEGHIKLNORSTUZacdeghijklnorstuz\u{1b7}\u{292}"),
    ("\u{30c}\u{307}", "Ss"),
    ("\u{30f}", "AEIORUaeioru\u{474}\u{475}"),
    ("\u{311}", "AEIORUaeioru"),
    (
        "\u{313}",
        concat!(
            "\u{391}\u{395}\u{397}\u{399}\u{39f}\u{3a9}\u{3b1}\u{3b5}\u{3b7}\u{3b9}",
            "\u{3bf}\u{3c1}\u{3c5}\u{3c9}",
        ),
    ),
    (
        "\u{313}\u{300}",
        concat!(
            "\u{391}\u{395}\u{397}\u{399}\u{39f}\u{3a9}\u{3b1}\u{3b5}\u{3b7}\u{3b9}",
            "\u{3bf}\u{3c5}\u{3c9}",
        ),
    ),
    ("\u{313}\u{300}\u{345}", "\u{391}\u{397}\u{3a9}\u{3b1}\u{3b7}\u{3c9}"),
    (
        "\u{313}\u{301}",
        concat!(
            "\u{391}\u{395}\u{397}\u{399}\u{39f}\u{3a9}\u{3b1}\u{3b5}\u{3b7}\u{3b9}",
            "\u{3bf}\u{3c5}\u{3c9}",
        ),
    ),
    ("\u{313}\u{301}\u{345}", "\u{391}\u{397}\u{3a9}\u{3b1}\u{3b7}\u{3c9}"),
    ("\u{313}\u{342}", "\u{391}\u{397}\u{399}\u{3a9}\u{3b1}\u{3b7}\u{3b9}\u{3c5}\u{3c9}"),
    ("\u{313}\u{342}\u{345}", "\u{391}\u{397}\u{3a9}\u{3b1}\u{3b7}\u{3c9}"),
    ("\u{313}\u{345}", "\u{391}\u{397}\u{3a9}\u{3b1}\u{3b7}\u{3c9}"),
    (
        "\u{314}",
        concat!(
            "\u{391}\u{395}\u{397}\u{399}\u{39f}\u{3a1}\u{3a5}\u{3a9}\u{3b1}\u{3b5}",
            "\u{3b7}\u{3b9}\u{3bf}\u{3c1}\u{3c5}\u{3c9}",
        ),
    ),
    (
        "\u{314}\u{300}",
        concat!(
            "\u{391}\u{395}\u{397}\u{399}\u{39f}\u{3a5}\u{3a9}\u{3b1}\u{3b5}\u{3b7}",
            "\u{3b9}\u{3bf}\u{3c5}\u{3c9}",
        ),
    ),
    ("\u{314}\u{300}\u{345}", "\u{391}\u{397}\u{3a9}\u{3b1}\u{3b7}\u{3c9}"),
    (
        "\u{314}\u{301}",
        concat!(
            "\u{391}\u{395}\u{397}\u{399}\u{39f}\u{3a5}\u{3a9}\u{3b1}\u{3b5}\u{3b7}",
            "\u{3b9}\u{3bf}\u{3c5}\u{3c9}",
        ),
    ),
    ("\u{314}\u{301}\u{345}", "\u{391}\u{397}\u{3a9}\u{3b1}\u{3b7}\u{3c9}"),
    ("\u{314}\u{342}", "\u{391}\u{397}\u{399}\u{3a5}\u{3a9}\u{3b1}\u{3b7}\u{3b9}\u{3c5}\u{3c9}"),
    ("\u{314}\u{342}\u{345}", "\u{391}\u{397}\u{3a9}\u{3b1}\u{3b7}\u{3c9}"),
    ("\u{314}\u{345}", "\u{391}\u{397}\u{3a9}\u{3b1}\u{3b7}\u{3c9}"),
    ("\u{31b}", "OUou"),
    ("\u{31b}\u{300}", "OUou"),
    ("\u{31b}\u{301}", "OUou"),
    ("\u{31b}\u{303}", "OUou"),
    ("\u{31b}\u{309}", "OUou"),
    ("\u{31b}\u{323}", "OUou"),
    ("\u{323}", "ABDEHIKLMNORSTUVWYZabdehiklmnorstuvwyz"),
    ("\u{323}\u{302}", "AEOaeo"),
    ("\u{323}\u{304}", "LRlr"),
    ("\u{323}\u{306}", "Aa"),
    ("\u{323}\u{307}", "Ss"),
    ("\u{324}", "Uu"),
    ("\u{325}", "Aa"),
    ("\u{326}", "STst"),
    ("\u{327}", "CDEGHKLNRSTcdeghklnrst"),
    ("\u{327}\u{301}", "Cc"),
    ("\u{327}\u{306}", "Ee"),
    ("\u{328}", "AEIOUaeiou"),
    ("\u{328}\u{304}", "Oo"),
    ("\u{32d}", "DELNTUdelntu"),
    ("\u{32e}", "Hh"),
    ("\u{330}", "EIUeiu"),
    ("\u{331}", "BDKLNRTZbdhklnrtz"),
    ("\u{342}", "\u{3b1}\u{3b7}\u{3b9}\u{3c5}\u{3c9}"),
    ("\u{342}\u{345}", "\u{3b1}\u{3b7}\u{3c9}"),
    ("\u{345}", "\u{391}\u{397}\u{3a9}\u{3b1}\u{3b7}\u{3c9}"),
];

/// Letters and letter sequences with precomposed forms that do not decompose canonically.
pub const COLLATION_VARIANTS: &[(&str, &str)] = &[
    ("AA", "\u{a732}"),
    ("AE", "\u{c6}\u{1e2}\u{1fc}"),
    ("AO", "\u{a734}"),
    ("AU", "\u{a736}"),
    ("AV", "\u{a738}\u{a73a}"),
    ("AY", "\u{a73c}"),
    ("D", "\u{d0}\u{110}\u{a779}"),
    ("DZ", "\u{1c4}\u{1f1}"),
    ("Dz", "\u{1c5}\u{1f2}"),
    ("F", "\u{a77b}"),
    ("G", "\u{a77d}"),
    ("H", "\u{126}"),
    ("IJ", "\u{132}"),
    ("L", "\u{141}"),
    ("LJ", "\u{1c7}"),
    ("LL", "\u{1efa}"),
    ("Lj", "\u{1c8}"),
    ("NJ", "\u{1ca}"),
    ("Nj", "\u{1cb}"),
    ("O", "\u{d8}\u{1fe}"),
    ("OE", "\u{152}"),
    ("OO", "\u{a74e}"),
    ("R", "\u{a782}"),
    ("S", "\u{a784}"),
    ("SS", "\u{1e9e}"),
    ("T", "\u{a786}"),
    ("Tz", "\u{a728}"),
    ("VY", "\u{a760}"),
    ("aa", "\u{a733}"),
    ("ae", "\u{e6}\u{1e3}\u{1fd}"),
    ("ao", "\u{a735}"),
    ("au", "\u{a737}"),
    ("av", "\u{a739}\u{a73b}"),
    ("ay", "\u{a73d}"),
    ("d", "\u{f0}\u{111}\u{a77a}"),
    ("db", "\u{238}"),
    ("dz", "\u{1c6}\u{1f3}\u{2a3}"),
    ("d\u{291}", "\u{2a5}"),
    ("d\u{292}", "\u{2a4}"),
    ("f", "\u{a77c}"),
    ("ff", "\u{fb00}"),
    ("ffi", "\u{fb03}"),
    ("ffl", "\u{fb04}"),
    ("fi", "\u{fb01}"),
    ("fl", "\u{fb02}"),
    ("f\u{14b}", "\u{2a9}"),
    ("g", "\u{1d79}"),
    ("h", "\u{127}\u{210f}"),
    ("ij", "\u{133}"),
    ("l", "\u{142}"),
    ("lj", "\u{1c9}"),
    ("ll", "\u{1efb}"),
    ("ls", "\u{2aa}"),
    ("lz", "\u{2ab}"),
    ("n", "\u{149}"),
    ("nj", "\u{1cc}"),
    ("o", "\u{f8}\u{1ff}"),
    ("oe", "\u{153}"),
    ("oo", "\u{a74f}"),
    ("qp", "\u{239}"),
    ("r", "\u{a783}"),
    ("s", "\u{a785}"),
    ("ss", "\u{df}"),
    ("st", "\u{fb05}\u{fb06}"),
    ("t", "\u{a787}"),
    ("th", "\u{1d7a}"),
    ("ts", "\u{1be}\u{2a6}"),
    ("tz", "\u{a729}"),
    ("t\u{255}", "\u{2a8}"),
    ("t\u{283}", "\u{2a7}"),
    ("vy", "\u{a761}"),
    ("zw", "\u{18d}"),
    ("\u{39a}\u{3b1}\u{3b9}", "\u{3cf}"),
    ("\u{3ba}\u{3b1}\u{3b9}", "\u{3d7}"),
    ("\u{3c3}", "\u{3c2}\u{3f2}\u{1d6d3}\u{1d70d}\u{1d747}\u{1d781}\u{1d7bb}"),
    ("\u{413}", "\u{490}"),
    ("\u{41e}", "\u{a668}\u{a66a}\u{a66c}"),
    ("\u{433}", "\u{491}"),
    ("\u{43e}", "\u{a669}\u{a66b}\u{a66d}"),
    ("\u{565}\u{582}", "\u{587}"),
    ("\u{574}\u{565}", "\u{fb14}"),
    ("\u{574}\u{56b}", "\u{fb15}"),
    ("\u{574}\u{56d}", "\u{fb17}"),
    ("\u{574}\u{576}", "\u{fb13}"),
    ("\u{57e}\u{576}", "\u{fb16}"),
    ("\u{2c95}\u{2c81}\u{2c93}", "\u{2ce4}"),
];
