/*
 * src/builtin_words.rs
 * 組み込みの単語データ (単語リストが指定されなかったときの予備)
 */

/// (見出し語, 意味, ヒント, 品詞) の一覧 (品詞ごと)
pub const BUILTIN_WORDS: &[(&str, &str, &str, &str)] = &[
    // 名詞
    ("cat", "猫", "にゃーと鳴く", "名詞"),
    ("dog", "犬", "わんと鳴く", "名詞"),
    ("sky", "空", "見上げると青い", "名詞"),
    ("sea", "海", "しょっぱい水", "名詞"),
    ("mountain", "山", "富士は日本一", "名詞"),
    ("river", "川", "上流と下流がある", "名詞"),
    ("car", "車", "道路を走る", "名詞"),
    ("apple", "りんご", "赤い果物", "名詞"),
    ("orange", "みかん", "冬のこたつで", "名詞"),
    ("telephone", "電話", "もしもし", "名詞"),
    ("clock", "時計", "時間を知らせる", "名詞"),
    ("airplane", "飛行機", "空を飛ぶ乗り物", "名詞"),
    ("library", "図書館", "本を借りる場所", "名詞"),
    ("zoo", "動物園", "パンダがいるかも", "名詞"),
    ("aquarium", "水族館", "魚を見る場所", "名詞"),
    ("parking lot", "駐車場", "車を停める", "名詞"),
    ("highway", "高速道路", "料金所がある", "名詞"),

    // 動詞
    ("run", "走る", "速く移動する", "動詞"),
    ("walk", "歩く", "ゆっくり移動する", "動詞"),
    ("insist", "主張する", "ゆずらない", "動詞"),
    ("borrow", "借りる", "あとで返す", "動詞"),
    ("lend", "貸す", "相手に使わせる", "動詞"),
    ("remember", "覚えている", "忘れない", "動詞"),
    ("arrive", "到着する", "目的地に着く", "動詞"),

    // 形容詞
    ("beautiful", "美しい", "見とれるほど", "形容詞"),
    ("quiet", "静かな", "音がしない", "形容詞"),
    ("heavy", "重い", "持ち上げにくい", "形容詞"),
    ("bright", "明るい", "光が多い", "形容詞"),
    ("ancient", "古代の", "ずっと昔の", "形容詞"),
];
