//! Article, talk and user info mappers

use blog_core::{Article, Talk, UserInfo};

use crate::models::{ArticleModel, TalkModel, UserInfoModel};

impl From<ArticleModel> for Article {
    fn from(model: ArticleModel) -> Self {
        Article {
            id: model.id,
            user_id: model.user_id,
            title: model.article_title,
        }
    }
}

impl From<TalkModel> for Talk {
    fn from(model: TalkModel) -> Self {
        Talk {
            id: model.id,
            user_id: model.user_id,
        }
    }
}

impl From<UserInfoModel> for UserInfo {
    fn from(model: UserInfoModel) -> Self {
        UserInfo {
            id: model.id,
            nickname: model.nickname,
            email: model.email,
            avatar: model.avatar,
        }
    }
}
