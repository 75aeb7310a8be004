//! 测试局面库
//!
//! 提供命名的 FEN 局面，方便测试、基准和调试

/// 初始局面
pub const START: &str = "rheagaehr/9/1c5c1/s1s1s1s1s/9/9/S1S1S1S1S/1C5C1/9/RHEAGAEHR r";

/// 将帅对脸，中间无子
pub const FACING_GENERALS: &str = "4g4/9/9/9/9/9/9/9/9/4G4 r";

/// 炮隔一个卒打车
pub const CANNON_SCREEN: &str = "3g5/9/9/9/C2s2r2/9/9/9/9/4G4 r";

/// 马腿被卒蹩住
pub const HOBBLED_HORSE: &str = "3g5/9/9/4s4/4H4/9/9/9/9/4G4 r";

/// 车可以吃马（4 分）或卒（1 分），吃马是唯一最优
pub const CHARIOT_HUNT: &str = "s4g3/9/9/9/R3h4/9/9/9/9/4G4 r";

/// 吃中卒会被黑车反吃，两步贪婪应当拒绝
pub const POISONED_SOLDIER: &str = "4rg3/9/9/9/R3s4/9/9/9/9/4G3R r";

/// 黑方被自己的子困死，无子可动
pub const BLACK_STALEMATED: &str = "3gsa3/3sa4/3a1a3/9/9/9/9/9/9/4G4 b";

/// 只剩将帅，错开两列
pub const BARE_GENERALS: &str = "3g5/9/9/9/9/9/9/9/9/4G4 r";

/// 所有局面
pub const ALL: [&str; 8] = [
    START,
    FACING_GENERALS,
    CANNON_SCREEN,
    HOBBLED_HORSE,
    CHARIOT_HUNT,
    POISONED_SOLDIER,
    BLACK_STALEMATED,
    BARE_GENERALS,
];

/// 按名字查找局面（命令行用）
pub fn by_name(name: &str) -> Option<&'static str> {
    match name.to_lowercase().as_str() {
        "start" => Some(START),
        "facing_generals" => Some(FACING_GENERALS),
        "cannon_screen" => Some(CANNON_SCREEN),
        "hobbled_horse" => Some(HOBBLED_HORSE),
        "chariot_hunt" => Some(CHARIOT_HUNT),
        "poisoned_soldier" => Some(POISONED_SOLDIER),
        "black_stalemated" => Some(BLACK_STALEMATED),
        "bare_generals" => Some(BARE_GENERALS),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Board;

    #[test]
    fn test_all_positions_parse() {
        for fen in ALL {
            let board = Board::from_fen(fen);
            assert!(board.is_ok(), "bad position {}: {:?}", fen, board.err());
        }
    }

    #[test]
    fn test_by_name() {
        assert_eq!(by_name("START"), Some(START));
        assert_eq!(by_name("black_stalemated"), Some(BLACK_STALEMATED));
        assert_eq!(by_name("nope"), None);
    }
}
